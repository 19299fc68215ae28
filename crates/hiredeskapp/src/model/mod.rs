//! # Domain Model
//!
//! Three record types share the same storage mechanics: [`Candidate`], [`Job`]
//! and [`Interview`]. Each lives in its own [`Namespace`], stored as one JSON
//! array under `wf:<namespace>`.
//!
//! ## Identity and Timestamps
//!
//! - `id` is absent until the first save, when the store assigns a numeric
//!   string. It is never reassigned.
//! - `createdAt` is set once, at the first save.
//! - `updatedAt` is set on every successful save.
//!
//! ## Wire Format
//!
//! Records serialize as camelCase JSON. Every field other than the handful a
//! record cannot exist without has a serde default, so partially filled
//! input (a form, a JSON file piped to the CLI) decodes into a complete
//! record. Status-like fields are closed enums; a value outside the
//! enumeration fails to decode, which the store reports as a validation error.
//!
//! Enum labels are the Korean strings the dashboard displays (`신규`,
//! `진행중`, ...). The Rust variant names are their English equivalents.

use crate::validate::ValidationError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod candidate;
pub mod interview;
pub mod job;

pub use candidate::{
    Attachment, Candidate, CandidateStatus, Evaluation, HistoryAction, HistoryEntry,
};
pub use interview::{Interview, InterviewStatus, InterviewType};
pub use job::{EmploymentType, Job, JobStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Candidates,
    Jobs,
    Interviews,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [
        Namespace::Candidates,
        Namespace::Jobs,
        Namespace::Interviews,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Candidates => "candidates",
            Namespace::Jobs => "jobs",
            Namespace::Interviews => "interviews",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = crate::error::HireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "candidates" | "candidate" => Ok(Namespace::Candidates),
            "jobs" | "job" => Ok(Namespace::Jobs),
            "interviews" | "interview" => Ok(Namespace::Interviews),
            other => Err(crate::error::HireError::UnknownNamespace(other.to_string())),
        }
    }
}

/// Behavior shared by every stored record type.
pub trait Record: Serialize + DeserializeOwned + Clone + fmt::Debug {
    const NAMESPACE: Namespace;

    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: String);

    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn set_created_at(&mut self, at: DateTime<Utc>);
    fn updated_at(&self) -> Option<DateTime<Utc>>;

    /// Domain rules the type system does not already enforce (ranges,
    /// required text, formats).
    fn check(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Fill per-type defaults right before a write. `previous` is the stored
    /// version when this save replaces an existing record.
    fn prepare(&mut self, _previous: Option<&Self>, _now: DateTime<Utc>) {}
}

/// Implements the identity and timestamp accessors of [`Record`] for a
/// struct with `id`, `created_at` and `updated_at` fields.
macro_rules! record_identity {
    () => {
        fn id(&self) -> Option<&str> {
            self.id.as_deref()
        }

        fn set_id(&mut self, id: String) {
            self.id = Some(id);
        }

        fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
            self.created_at
        }

        fn set_created_at(&mut self, at: chrono::DateTime<chrono::Utc>) {
            self.created_at = Some(at);
        }

        fn updated_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
            self.updated_at
        }
    };
}
pub(crate) use record_identity;

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::invalid(field, "is required"));
    }
    Ok(())
}

pub(crate) fn require_score(field: &str, value: u8) -> Result<(), ValidationError> {
    if value > 100 {
        return Err(ValidationError::invalid(
            field,
            format!("must be between 0 and 100, got {}", value),
        ));
    }
    Ok(())
}
