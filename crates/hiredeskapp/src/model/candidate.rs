use super::{record_identity, require_score, require_text, Namespace, Record};
use crate::validate::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum CandidateStatus {
    #[default]
    #[serde(rename = "신규")]
    New,
    #[serde(rename = "서류검토")]
    Screening,
    #[serde(rename = "서류합격")]
    ScreeningPassed,
    #[serde(rename = "1차면접")]
    FirstInterview,
    #[serde(rename = "2차면접")]
    SecondInterview,
    #[serde(rename = "최종면접")]
    FinalInterview,
    #[serde(rename = "최종합격")]
    Hired,
    #[serde(rename = "불합격")]
    Rejected,
    #[serde(rename = "보류")]
    OnHold,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 9] = [
        CandidateStatus::New,
        CandidateStatus::Screening,
        CandidateStatus::ScreeningPassed,
        CandidateStatus::FirstInterview,
        CandidateStatus::SecondInterview,
        CandidateStatus::FinalInterview,
        CandidateStatus::Hired,
        CandidateStatus::Rejected,
        CandidateStatus::OnHold,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CandidateStatus::New => "신규",
            CandidateStatus::Screening => "서류검토",
            CandidateStatus::ScreeningPassed => "서류합격",
            CandidateStatus::FirstInterview => "1차면접",
            CandidateStatus::SecondInterview => "2차면접",
            CandidateStatus::FinalInterview => "최종면접",
            CandidateStatus::Hired => "최종합격",
            CandidateStatus::Rejected => "불합격",
            CandidateStatus::OnHold => "보류",
        }
    }

    /// Hired and rejected candidates are out of the pipeline.
    pub fn is_closed(&self) -> bool {
        matches!(self, CandidateStatus::Hired | CandidateStatus::Rejected)
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Interviewer scores, each 0-100.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Evaluation {
    pub technical: u8,
    pub communication: u8,
    pub problem_solving: u8,
    pub teamwork: u8,
    pub culture_fit: u8,
    pub notes: String,
}

impl Evaluation {
    fn scores(&self) -> [(&'static str, u8); 5] {
        [
            ("evaluation.technical", self.technical),
            ("evaluation.communication", self.communication),
            ("evaluation.problemSolving", self.problem_solving),
            ("evaluation.teamwork", self.teamwork),
            ("evaluation.cultureFit", self.culture_fit),
        ]
    }

    /// Mean of the five sub-scores, or None when nothing has been scored.
    pub fn average(&self) -> Option<f64> {
        let scores = self.scores();
        if scores.iter().all(|(_, s)| *s == 0) {
            return None;
        }
        let total: u32 = scores.iter().map(|(_, s)| u32::from(*s)).sum();
        Some(f64::from(total) / scores.len() as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Created,
    Updated,
    StatusChanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub action: HistoryAction,
    pub description: String,
}

/// A resume file stored inline as a base64 `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub file_name: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub position: String,
    #[serde(default)]
    pub status: CandidateStatus,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_date: Option<NaiveDate>,
    #[serde(default)]
    pub score: u8,
    #[serde(default)]
    pub evaluation: Evaluation,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, email: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            phone: String::new(),
            position: position.into(),
            status: CandidateStatus::New,
            skills: Vec::new(),
            applied_date: None,
            score: 0,
            evaluation: Evaluation::default(),
            history: Vec::new(),
            resume: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_status(mut self, status: CandidateStatus) -> Self {
        self.status = status;
        self
    }
}

impl Record for Candidate {
    const NAMESPACE: Namespace = Namespace::Candidates;

    record_identity!();

    fn check(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("position", &self.position)?;
        require_text("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(ValidationError::invalid("email", "is not an email address"));
        }
        require_score("score", self.score)?;
        for (field, score) in self.evaluation.scores() {
            require_score(field, score)?;
        }
        if let Some(resume) = &self.resume {
            require_text("resume.fileName", &resume.file_name)?;
            if !resume.data.starts_with("data:") {
                return Err(ValidationError::invalid(
                    "resume.data",
                    "must be a data: URL",
                ));
            }
        }
        Ok(())
    }

    fn prepare(&mut self, previous: Option<&Self>, now: DateTime<Utc>) {
        if self.applied_date.is_none() {
            self.applied_date = Some(now.date_naive());
        }

        let (action, description) = match previous {
            None => (
                HistoryAction::Created,
                format!("Applied for {}", self.position),
            ),
            Some(prev) if prev.status != self.status => (
                HistoryAction::StatusChanged,
                format!("Status changed: {} → {}", prev.status, self.status),
            ),
            Some(_) => (HistoryAction::Updated, "Profile updated".to_string()),
        };
        // the stored log is authoritative; incoming history is ignored on update
        if let Some(prev) = previous {
            self.history = prev.history.clone();
        }
        self.history.push(HistoryEntry {
            timestamp: now,
            action,
            description,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_json_decodes_with_defaults() {
        let candidate: Candidate = serde_json::from_value(json!({
            "name": "Hong",
            "email": "hong@example.com",
            "position": "Engineer",
            "status": "신규"
        }))
        .unwrap();

        assert_eq!(candidate.id, None);
        assert_eq!(candidate.status, CandidateStatus::New);
        assert_eq!(candidate.score, 0);
        assert!(candidate.history.is_empty());
        assert_eq!(candidate.applied_date, None);
    }

    #[test]
    fn test_unknown_status_fails_to_decode() {
        let result: Result<Candidate, _> = serde_json::from_value(json!({
            "name": "Hong",
            "email": "hong@example.com",
            "position": "Engineer",
            "status": "not-a-real-status"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_status_labels_match_wire_format() {
        for status in CandidateStatus::ALL {
            let wire = serde_json::to_value(status).unwrap();
            assert_eq!(wire, json!(status.label()));
        }
    }

    #[test]
    fn test_check_rejects_out_of_range_scores() {
        let mut candidate = Candidate::new("Kim", "kim@example.com", "Designer");
        candidate.evaluation.teamwork = 120;
        let err = candidate.check().unwrap_err();
        assert!(err.to_string().contains("evaluation.teamwork"));
    }

    #[test]
    fn test_check_requires_email_shape() {
        let candidate = Candidate::new("Kim", "not-an-email", "Designer");
        assert!(candidate.check().is_err());
    }

    #[test]
    fn test_check_requires_data_url_resume() {
        let mut candidate = Candidate::new("Kim", "kim@example.com", "Designer");
        candidate.resume = Some(Attachment {
            file_name: "cv.pdf".to_string(),
            data: "JVBERi0xLjQK".to_string(),
        });
        assert!(candidate.check().is_err());

        candidate.resume.as_mut().unwrap().data =
            "data:application/pdf;base64,JVBERi0xLjQK".to_string();
        assert!(candidate.check().is_ok());
    }

    #[test]
    fn test_prepare_records_creation_and_applied_date() {
        let now = Utc::now();
        let mut candidate = Candidate::new("Kim", "kim@example.com", "Designer");
        candidate.prepare(None, now);

        assert_eq!(candidate.applied_date, Some(now.date_naive()));
        assert_eq!(candidate.history.len(), 1);
        assert_eq!(candidate.history[0].action, HistoryAction::Created);
    }

    #[test]
    fn test_prepare_records_status_change() {
        let now = Utc::now();
        let previous = Candidate::new("Kim", "kim@example.com", "Designer");
        let mut next = previous.clone().with_status(CandidateStatus::Screening);
        next.prepare(Some(&previous), now);

        let entry = next.history.last().unwrap();
        assert_eq!(entry.action, HistoryAction::StatusChanged);
        assert_eq!(entry.description, "Status changed: 신규 → 서류검토");
    }

    #[test]
    fn test_evaluation_average() {
        let mut evaluation = Evaluation::default();
        assert_eq!(evaluation.average(), None);
        evaluation.technical = 90;
        evaluation.communication = 80;
        evaluation.problem_solving = 70;
        evaluation.teamwork = 60;
        evaluation.culture_fit = 50;
        assert_eq!(evaluation.average(), Some(70.0));
    }
}
