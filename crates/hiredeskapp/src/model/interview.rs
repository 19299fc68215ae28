use super::{record_identity, require_score, require_text, Namespace, Record};
use crate::validate::ValidationError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_DURATION_MINUTES: u32 = 15;
pub const MAX_DURATION_MINUTES: u32 = 480;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InterviewType {
    #[serde(rename = "전화")]
    Phone,
    #[default]
    #[serde(rename = "화상")]
    Video,
    #[serde(rename = "대면")]
    Onsite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InterviewStatus {
    #[default]
    #[serde(rename = "예정")]
    Scheduled,
    #[serde(rename = "완료")]
    Completed,
    #[serde(rename = "취소")]
    Cancelled,
    #[serde(rename = "불참")]
    NoShow,
}

fn default_duration() -> u32 {
    60
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub candidate_id: String,
    /// Copied from the candidate when scheduled; not kept in sync.
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub position: String,
    #[serde(rename = "type", default)]
    pub interview_type: InterviewType,
    pub date: NaiveDate,
    /// Local start time, `HH:MM`.
    pub time: String,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub interviewer: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: InterviewStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub meeting_link: String,
    #[serde(default)]
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Interview {
    pub fn new(
        candidate_id: impl Into<String>,
        candidate_name: impl Into<String>,
        date: NaiveDate,
        time: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            candidate_id: candidate_id.into(),
            candidate_name: candidate_name.into(),
            position: String::new(),
            interview_type: InterviewType::Video,
            date,
            time: time.into(),
            duration: default_duration(),
            interviewer: String::new(),
            location: String::new(),
            status: InterviewStatus::Scheduled,
            notes: String::new(),
            meeting_link: String::new(),
            feedback: String::new(),
            score: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        parse_time(&self.time).map(|t| self.date.and_time(t))
    }
}

fn parse_time(time: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(time.trim(), "%H:%M").ok()
}

impl Record for Interview {
    const NAMESPACE: Namespace = Namespace::Interviews;

    record_identity!();

    fn check(&self) -> Result<(), ValidationError> {
        require_text("candidateId", &self.candidate_id)?;
        if parse_time(&self.time).is_none() {
            return Err(ValidationError::invalid("time", "must be HH:MM"));
        }
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&self.duration) {
            return Err(ValidationError::invalid(
                "duration",
                format!(
                    "must be between {} and {} minutes, got {}",
                    MIN_DURATION_MINUTES, MAX_DURATION_MINUTES, self.duration
                ),
            ));
        }
        if let Some(score) = self.score {
            require_score("score", score)?;
        }
        Ok(())
    }
}
