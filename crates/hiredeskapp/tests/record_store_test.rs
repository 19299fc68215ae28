use hiredeskapp::config::HireConfig;
use hiredeskapp::error::HireError;
use hiredeskapp::model::{Candidate, CandidateStatus, Namespace};
use hiredeskapp::test_utils::TestEnv;
use hiredeskapp::validate::ValidationMode;
use serde_json::json;
use std::fs;

#[test]
fn test_new_candidate_scenario() {
    let env = TestEnv::new();
    let api = env.open(HireConfig::default());

    let saved = api
        .candidates()
        .save_value(json!({
            "name": "홍길동",
            "email": "gildong@example.com",
            "position": "백엔드 개발자"
        }))
        .unwrap();

    assert_eq!(saved.status, CandidateStatus::New);
    assert!(saved.id.as_deref().unwrap().chars().all(|c| c.is_ascii_digit()));
    assert_eq!(saved.score, 0);
    assert!(saved.applied_date.is_some());

    let raw = fs::read_to_string(env.data.join("wf%3Acandidates.kv")).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored[0]["status"], "신규");
    assert_eq!(stored[0]["name"], "홍길동");
}

#[test]
fn test_new_candidate_adds_exactly_one_record() {
    let env = TestEnv::new();
    let api = env.open(HireConfig::default());
    api.startup().unwrap();
    let candidates = api.candidates();
    let before = candidates.count();
    assert!(before > 0);

    let saved = candidates
        .save(Candidate::new("홍길동", "gildong@example.com", "백엔드 개발자"))
        .unwrap();

    assert_eq!(candidates.count(), before + 1);
    let id = saved.id.clone().unwrap();
    assert_eq!(candidates.find_by_id(&id), Some(saved.clone()));

    let reopened = env.open(HireConfig::default());
    assert_eq!(reopened.candidates().find_by_id(&id), Some(saved));
}

#[test]
fn test_corrupted_primary_recovers_from_snapshot_after_restart() {
    let env = TestEnv::new();
    {
        let api = env.open(HireConfig::default());
        api.startup().unwrap();
    }
    fs::write(env.data.join("wf%3Acandidates.kv"), "{not json").unwrap();

    let api = env.open(HireConfig::default());
    assert_eq!(api.candidates().find_all().len(), 5);
    // the seed sees data and does not overwrite the damaged key
    assert_eq!(api.startup().unwrap().candidates, 0);
}

#[test]
fn test_strict_mode_from_config() {
    let env = TestEnv::new();
    let config = HireConfig {
        validation_mode: ValidationMode::Strict,
        ..Default::default()
    };
    let api = env.open(config);

    let err = api
        .save_value(
            Namespace::Jobs,
            json!({ "title": "DBA'; DROP TABLE jobs; --" }),
        )
        .unwrap_err();

    assert!(matches!(err, HireError::Validation(_)));
    assert!(api.jobs().find_all().is_empty());
}

#[test]
fn test_over_length_field_rejected_with_custom_limit() {
    let env = TestEnv::new();
    let config = HireConfig {
        max_field_length: 20,
        ..Default::default()
    };
    let api = env.open(config);

    let mut candidate = Candidate::new("Kim", "kim@example.com", "Dev");
    candidate.phone = "0".repeat(21);
    assert!(api.candidates().save(candidate.clone()).is_err());

    candidate.phone = "0".repeat(20);
    assert!(api.candidates().save(candidate).is_ok());
}
