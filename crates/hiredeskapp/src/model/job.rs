use super::{record_identity, require_text, Namespace, Record};
use crate::validate::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JobStatus {
    #[default]
    #[serde(rename = "진행중")]
    Open,
    #[serde(rename = "마감")]
    Closed,
    #[serde(rename = "임시저장")]
    Draft,
}

impl JobStatus {
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Open => "진행중",
            JobStatus::Closed => "마감",
            JobStatus::Draft => "임시저장",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EmploymentType {
    #[default]
    #[serde(rename = "정규직")]
    FullTime,
    #[serde(rename = "계약직")]
    Contract,
    #[serde(rename = "인턴")]
    Intern,
    #[serde(rename = "파트타임")]
    PartTime,
}

fn default_positions() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub department: String,
    /// Number of openings.
    #[serde(default = "default_positions")]
    pub positions: u32,
    #[serde(default)]
    pub experience: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub benefits: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub employment_type: EmploymentType,
    #[serde(default)]
    pub salary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(title: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            department: department.into(),
            positions: default_positions(),
            experience: String::new(),
            deadline: None,
            status: JobStatus::Open,
            skills: Vec::new(),
            description: String::new(),
            requirements: String::new(),
            benefits: String::new(),
            location: String::new(),
            employment_type: EmploymentType::FullTime,
            salary: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Open and not past its deadline.
    pub fn is_accepting(&self, today: NaiveDate) -> bool {
        self.status == JobStatus::Open && self.deadline.map_or(true, |d| d >= today)
    }
}

impl Record for Job {
    const NAMESPACE: Namespace = Namespace::Jobs;

    record_identity!();

    fn check(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        if self.positions == 0 {
            return Err(ValidationError::invalid("positions", "must be at least 1"));
        }
        Ok(())
    }
}
