use super::{keys, Storage};
use crate::error::Result;
use crate::events::{ChangeEvent, ChangeKind};
use crate::model::Record;
use crate::validate::ValidationError;
use chrono::SubsecRound;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::rc::Rc;
use tracing::{debug, error, info, warn};

/// Whole-collection CRUD for one record type.
///
/// Every operation reads the full collection, changes it in memory and
/// writes it back with a single `set`. Reads degrade instead of failing;
/// saves fail only when validation rejects the input.
pub struct RecordStore<R: Record> {
    storage: Rc<Storage>,
    _record: PhantomData<R>,
}

impl<R: Record> Clone for RecordStore<R> {
    fn clone(&self) -> Self {
        Self::new(self.storage.clone())
    }
}

impl<R: Record> RecordStore<R> {
    pub fn new(storage: Rc<Storage>) -> Self {
        Self {
            storage,
            _record: PhantomData,
        }
    }

    fn decode<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.kv().get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(namespace = %R::NAMESPACE, key, error = %e, "collection is unreadable");
                None
            }
        }
    }

    /// The primary collection only, without any fallback.
    pub fn read_primary(&self) -> Option<Vec<R>> {
        self.decode(&keys::primary(R::NAMESPACE))
    }

    /// Every record in the namespace.
    ///
    /// A pending emergency copy is newer than the primary collection and wins
    /// over it. Otherwise the primary is read, then the latest fresh
    /// snapshot, then an empty list.
    pub fn find_all(&self) -> Vec<R> {
        let namespace = R::NAMESPACE;
        if let Some(records) = self.decode::<Vec<R>>(&keys::emergency(namespace)) {
            warn!(%namespace, records = records.len(), "serving emergency copy");
            return records;
        }
        if let Some(records) = self.read_primary() {
            return records;
        }
        if let Some(records) = self.storage.backup().restore::<R>(namespace) {
            info!(%namespace, records = records.len(), "restored from snapshot");
            return records;
        }
        debug!(%namespace, "no stored collection");
        Vec::new()
    }

    pub fn find_by_id(&self, id: &str) -> Option<R> {
        self.find_all().into_iter().find(|r| r.id() == Some(id))
    }

    pub fn count(&self) -> usize {
        self.find_all().len()
    }

    /// Insert or update a record. A record without an id, or with an id not
    /// yet in the collection, is inserted.
    pub fn save(&self, record: R) -> Result<R> {
        let value = serde_json::to_value(&record)?;
        self.save_value(value)
    }

    /// Same as [`RecordStore::save`] for untyped JSON input.
    pub fn save_value(&self, value: Value) -> Result<R> {
        let namespace = R::NAMESPACE;
        // one millisecond instant for every timestamp this save writes
        let now = self.storage.clock().now().trunc_subsecs(3);

        let validated = self.storage.validator().validate(value, now)?;
        if !validated.sanitized.is_empty() {
            warn!(%namespace, fields = ?validated.sanitized, "input sanitized");
        }
        let mut record: R = serde_json::from_value(validated.value)
            .map_err(|e| ValidationError::invalid("record", e.to_string()))?;

        let mut records = self.find_all();
        let position = record
            .id()
            .and_then(|id| records.iter().position(|r| r.id() == Some(id)));
        let previous = position.map(|idx| records[idx].clone());

        record.prepare(previous.as_ref(), now);
        record.check()?;

        match previous.as_ref().and_then(|prev| prev.created_at()) {
            Some(created_at) => record.set_created_at(created_at),
            None if record.created_at().is_none() => record.set_created_at(now),
            None => {}
        }
        if record.id().is_none() {
            let id = self
                .storage
                .ids()
                .next(now.timestamp_millis(), |candidate| {
                    records.iter().any(|r| r.id() == Some(candidate))
                });
            record.set_id(id);
        }

        match position {
            Some(idx) => records[idx] = record.clone(),
            None => records.push(record.clone()),
        }
        self.persist(&records);

        let id = record.id().unwrap_or_default().to_string();
        debug!(%namespace, %id, "record saved");
        self.storage.notify(ChangeEvent {
            namespace,
            kind: ChangeKind::Saved { id },
        });
        Ok(record)
    }

    /// Remove a record. Returns `false`, without writing, when the id is not
    /// in the collection.
    pub fn delete(&self, id: &str) -> bool {
        let mut records = self.find_all();
        let before = records.len();
        records.retain(|r| r.id() != Some(id));
        if records.len() == before {
            return false;
        }
        self.persist(&records);
        self.storage.notify(ChangeEvent {
            namespace: R::NAMESPACE,
            kind: ChangeKind::Deleted { id: id.to_string() },
        });
        true
    }

    /// Overwrite the collection with trusted records (seed, import),
    /// skipping validation.
    pub fn replace_all(&self, records: Vec<R>) -> bool {
        let written = self.persist(&records);
        self.storage.notify(ChangeEvent {
            namespace: R::NAMESPACE,
            kind: ChangeKind::Replaced {
                count: records.len(),
            },
        });
        written
    }

    /// Snapshot whatever the primary key currently holds. Fallback data is
    /// never re-snapshotted, so an old snapshot cannot be refreshed by
    /// restoring it.
    pub fn snapshot(&self) -> bool {
        match self.read_primary() {
            Some(records) => self.storage.backup().snapshot(R::NAMESPACE, &records),
            None => false,
        }
    }

    fn persist(&self, records: &[R]) -> bool {
        let namespace = R::NAMESPACE;
        let raw = match serde_json::to_string(records) {
            Ok(raw) => raw,
            Err(e) => {
                error!(%namespace, error = %e, "could not encode collection");
                return false;
            }
        };

        // `records` already includes any pending emergency copy
        let kv = self.storage.kv();
        if kv.set(&keys::primary(namespace), &raw) {
            kv.remove(&keys::emergency(namespace));
            self.storage.backup().snapshot(namespace, records);
            return true;
        }

        error!(%namespace, records = records.len(), "collection write failed, keeping emergency copy");
        if !kv.set(&keys::emergency(namespace), &raw) {
            error!(%namespace, "emergency write failed, changes live only in this process");
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FixedClock};
    use crate::error::HireError;
    use crate::model::{Candidate, CandidateStatus, HistoryAction, Job, JobStatus, Namespace};
    use crate::store::backend::KvBackend;
    use crate::store::mem_backend::MemKvBackend;
    use crate::store::tiered::{Tier, TierKind, TieredStore};
    use crate::validate::{SoftValidator, ValidationMode, DEFAULT_MAX_FIELD_LENGTH};
    use chrono::Duration;
    use serde_json::json;
    use std::cell::RefCell;

    struct Fixture {
        clock: Rc<FixedClock>,
        backend: MemKvBackend,
        storage: Rc<Storage>,
    }

    fn fixture_with(mode: ValidationMode) -> Fixture {
        let clock = Rc::new(FixedClock::default());
        let backend = MemKvBackend::new();
        let kv = TieredStore::new(vec![Tier::new(TierKind::Memory, backend.clone())]);
        let storage = Storage::new(
            kv,
            SoftValidator::new(mode, DEFAULT_MAX_FIELD_LENGTH),
            Duration::days(7),
            clock.clone(),
        );
        Fixture {
            clock,
            backend,
            storage,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(ValidationMode::Soft)
    }

    #[test]
    fn test_save_then_find_round_trip() {
        let f = fixture();
        let jobs = f.storage.records::<Job>();

        let saved = jobs.save(Job::new("Backend Engineer", "Platform")).unwrap();
        let id = saved.id.clone().unwrap();

        assert_eq!(jobs.find_by_id(&id), Some(saved.clone()));
        assert_eq!(jobs.find_all(), vec![saved]);
    }

    #[test]
    fn test_new_candidate_defaults() {
        let f = fixture();
        let candidates = f.storage.records::<Candidate>();

        let saved = candidates
            .save_value(json!({
                "name": "Kim",
                "email": "kim@example.com",
                "position": "Designer"
            }))
            .unwrap();

        assert_eq!(saved.status, CandidateStatus::New);
        assert!(saved.id.as_deref().unwrap().parse::<i64>().is_ok());
        assert_eq!(saved.applied_date, Some(f.clock.now().date_naive()));
        assert_eq!(saved.score, 0);
        assert_eq!(saved.created_at, Some(f.clock.now()));
        assert_eq!(saved.history.len(), 1);
        assert_eq!(saved.history[0].action, HistoryAction::Created);
    }

    #[test]
    fn test_update_keeps_id_and_created_at() {
        let f = fixture();
        let jobs = f.storage.records::<Job>();

        let first = jobs.save(Job::new("QA", "Quality")).unwrap();
        f.clock.advance(Duration::hours(1));

        let mut edited = first.clone();
        edited.status = JobStatus::Closed;
        let second = jobs.save(edited).unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(jobs.count(), 1);
    }

    #[test]
    fn test_saving_same_record_twice_is_idempotent() {
        let f = fixture();
        let jobs = f.storage.records::<Job>();

        let saved = jobs.save(Job::new("QA", "Quality")).unwrap();
        jobs.save(saved.clone()).unwrap();
        jobs.save(saved).unwrap();

        assert_eq!(jobs.count(), 1);
    }

    #[test]
    fn test_candidate_history_grows_once_per_save() {
        let f = fixture();
        let candidates = f.storage.records::<Candidate>();

        let saved = candidates
            .save(Candidate::new("Lee", "lee@example.com", "PM"))
            .unwrap();
        let moved = candidates
            .save(saved.with_status(CandidateStatus::Screening))
            .unwrap();
        let touched = candidates.save(moved.clone()).unwrap();

        assert_eq!(moved.history.len(), 2);
        assert_eq!(moved.history[1].action, HistoryAction::StatusChanged);
        assert_eq!(moved.history[1].description, "Status changed: 신규 → 서류검토");
        assert_eq!(touched.history.len(), 3);
        assert_eq!(touched.history[2].action, HistoryAction::Updated);
    }

    #[test]
    fn test_ids_are_unique_within_one_millisecond() {
        let f = fixture();
        let jobs = f.storage.records::<Job>();

        let a = jobs.save(Job::new("A", "X")).unwrap();
        let b = jobs.save(Job::new("B", "X")).unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(jobs.count(), 2);
    }

    #[test]
    fn test_unknown_id_is_inserted_with_that_id() {
        let f = fixture();
        let jobs = f.storage.records::<Job>();

        let mut job = Job::new("Imported", "X");
        job.id = Some("42".to_string());
        jobs.save(job).unwrap();

        assert!(jobs.find_by_id("42").is_some());
    }

    #[test]
    fn test_malformed_status_is_rejected_without_write() {
        let f = fixture();
        let candidates = f.storage.records::<Candidate>();

        let result = candidates.save_value(json!({
            "name": "Park",
            "email": "park@example.com",
            "position": "Engineer",
            "status": "hired"
        }));

        assert!(matches!(result, Err(HireError::Validation(_))));
        assert!(f.backend.get("wf:candidates").unwrap().is_none());
    }

    #[test]
    fn test_field_one_over_limit_is_rejected() {
        let f = fixture();
        let candidates = f.storage.records::<Candidate>();

        let at_limit = "a".repeat(DEFAULT_MAX_FIELD_LENGTH);
        let mut ok = Candidate::new("Choi", "choi@example.com", "Writer");
        ok.phone = at_limit.clone();
        assert!(candidates.save(ok).is_ok());

        let mut too_long = Candidate::new("Choi", "choi@example.com", "Writer");
        too_long.phone = format!("{}a", at_limit);
        let err = candidates.save(too_long).unwrap_err();
        assert!(matches!(
            err,
            HireError::Validation(ValidationError::TooLong { .. })
        ));
        assert_eq!(candidates.count(), 1);
    }

    #[test]
    fn test_domain_check_rejects_bad_email() {
        let f = fixture();
        let candidates = f.storage.records::<Candidate>();

        let result = candidates.save(Candidate::new("Jung", "not-an-email", "Engineer"));
        assert!(result.is_err());
        assert_eq!(candidates.count(), 0);
    }

    #[test]
    fn test_soft_mode_sanitizes_markup() {
        let f = fixture();
        let jobs = f.storage.records::<Job>();

        let mut job = Job::new("Engineer", "Platform");
        job.description = "Great team<script>alert(1)</script>".to_string();
        let saved = jobs.save(job).unwrap();

        assert_eq!(saved.description, "Great team");
    }

    #[test]
    fn test_strict_mode_rejects_markup() {
        let f = fixture_with(ValidationMode::Strict);
        let jobs = f.storage.records::<Job>();

        let mut job = Job::new("Engineer", "Platform");
        job.description = "<script>alert(1)</script>".to_string();
        let err = jobs.save(job).unwrap_err();

        assert!(matches!(
            err,
            HireError::Validation(ValidationError::Disallowed { .. })
        ));
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let f = fixture();
        let jobs = f.storage.records::<Job>();
        jobs.save(Job::new("A", "X")).unwrap();
        let before = f.backend.get("wf:jobs").unwrap();

        assert!(!jobs.delete("does-not-exist"));
        assert_eq!(f.backend.get("wf:jobs").unwrap(), before);
    }

    #[test]
    fn test_delete_removes_record() {
        let f = fixture();
        let jobs = f.storage.records::<Job>();
        let saved = jobs.save(Job::new("A", "X")).unwrap();

        assert!(jobs.delete(saved.id.as_deref().unwrap()));
        assert!(jobs.find_all().is_empty());
    }

    #[test]
    fn test_corrupt_primary_falls_back_to_snapshot() {
        let f = fixture();
        let jobs = f.storage.records::<Job>();
        let saved = jobs.save(Job::new("A", "X")).unwrap();

        f.backend.insert_raw("wf:jobs", "[{broken");

        assert_eq!(jobs.find_all(), vec![saved]);
    }

    #[test]
    fn test_stale_snapshot_is_not_restored() {
        let f = fixture();
        let jobs = f.storage.records::<Job>();
        jobs.save(Job::new("A", "X")).unwrap();

        f.backend.insert_raw("wf:jobs", "not json");
        f.clock.advance(Duration::days(8));

        assert!(jobs.find_all().is_empty());
    }

    #[test]
    fn test_failed_write_keeps_emergency_copy() {
        let f = fixture();
        let jobs = f.storage.records::<Job>();
        f.backend.fail_writes_to("wf:jobs");

        let saved = jobs.save(Job::new("A", "X")).unwrap();

        assert!(f.backend.get("wf:jobs").unwrap().is_none());
        assert!(f.backend.get("wf:jobs_emergency").unwrap().is_some());
        assert_eq!(jobs.find_all(), vec![saved]);
    }

    #[test]
    fn test_emergency_copy_wins_over_stale_primary() {
        let f = fixture();
        let jobs = f.storage.records::<Job>();
        let a = jobs.save(Job::new("A", "X")).unwrap();

        f.backend.fail_writes_to("wf:jobs");
        let b = jobs.save(Job::new("B", "X")).unwrap();
        let b_id = b.id.clone().unwrap();

        assert_eq!(jobs.find_by_id(&b_id), Some(b.clone()));
        assert_eq!(jobs.count(), 2);

        f.backend.allow_writes_to("wf:jobs");
        let c = jobs.save(Job::new("C", "X")).unwrap();

        assert!(f.backend.get("wf:jobs_emergency").unwrap().is_none());
        assert_eq!(jobs.find_all(), vec![a, b, c]);
    }

    #[test]
    fn test_update_without_history_keeps_stored_log() {
        let f = fixture();
        let candidates = f.storage.records::<Candidate>();
        let saved = candidates
            .save(Candidate::new("Lee", "lee@example.com", "PM"))
            .unwrap();
        let moved = candidates
            .save(saved.with_status(CandidateStatus::Screening))
            .unwrap();
        assert_eq!(moved.history.len(), 2);

        let updated = candidates
            .save_value(json!({
                "id": moved.id,
                "name": "Lee",
                "email": "lee@example.com",
                "position": "Senior PM",
                "status": "서류검토"
            }))
            .unwrap();

        assert_eq!(updated.history.len(), 3);
        assert_eq!(updated.history[..2], moved.history[..]);
        assert_eq!(updated.history[2].action, HistoryAction::Updated);
    }

    #[test]
    fn test_edited_history_is_not_stored() {
        let f = fixture();
        let candidates = f.storage.records::<Candidate>();
        let saved = candidates
            .save(Candidate::new("Lee", "lee@example.com", "PM"))
            .unwrap();

        let mut tampered = saved.clone();
        tampered.history.clear();
        let updated = candidates.save(tampered).unwrap();

        assert_eq!(updated.history.len(), 2);
        assert_eq!(updated.history[0], saved.history[0]);
    }

    #[test]
    fn test_created_at_never_after_updated_at() {
        let f = fixture();
        f.clock.advance(Duration::nanoseconds(999_999));
        let jobs = f.storage.records::<Job>();

        let saved = jobs.save(Job::new("A", "X")).unwrap();

        assert_eq!(saved.created_at, saved.updated_at);
    }

    #[test]
    fn test_successful_write_clears_emergency_copy() {
        let f = fixture();
        let jobs = f.storage.records::<Job>();
        f.backend.insert_raw("wf:jobs_emergency", "[]");

        jobs.save(Job::new("A", "X")).unwrap();

        assert!(f.backend.get("wf:jobs_emergency").unwrap().is_none());
    }

    #[test]
    fn test_snapshot_reads_primary_only() {
        let f = fixture();
        let jobs = f.storage.records::<Job>();
        assert!(!jobs.snapshot());

        jobs.save(Job::new("A", "X")).unwrap();
        assert!(jobs.snapshot());
    }

    #[test]
    fn test_replace_all_bypasses_validation() {
        let f = fixture();
        let jobs = f.storage.records::<Job>();
        let mut job = Job::new("A", "X");
        job.id = Some("1".to_string());
        job.description = "<b>bold</b>".to_string();

        assert!(jobs.replace_all(vec![job.clone()]));
        assert_eq!(jobs.find_all(), vec![job]);
    }

    #[test]
    fn test_listeners_hear_every_change() {
        let f = fixture();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        f.storage.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        let jobs = f.storage.records::<Job>();
        let saved = jobs.save(Job::new("A", "X")).unwrap();
        let id = saved.id.unwrap();
        jobs.delete(&id);
        jobs.replace_all(Vec::new());

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|e| e.namespace == Namespace::Jobs));
        assert_eq!(seen[0].kind, ChangeKind::Saved { id: id.clone() });
        assert_eq!(seen[1].kind, ChangeKind::Deleted { id });
        assert_eq!(seen[2].kind, ChangeKind::Replaced { count: 0 });
    }
}
