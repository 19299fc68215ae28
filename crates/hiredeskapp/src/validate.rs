//! Soft validation of records before they are written.
//!
//! The validator works on the JSON form of a record, so one implementation
//! covers every record type and every nested string (skill lists, evaluation
//! notes, history descriptions).
//!
//! Checks, in order, for every string:
//! - Length: values longer than `max_len` characters are rejected in both
//!   modes.
//! - Script/markup: `<script>` blocks and tags, `<iframe>`/`<object>`/
//!   `<embed>`/`<style>` tags, `javascript:` URLs, inline `on*=` handlers.
//! - SQL metacharacters: `';`, `--`, `/* */`, and statements such as
//!   `UNION SELECT` or `DROP TABLE`.
//!
//! In [`ValidationMode::Soft`] (the default) matches are stripped and the
//! field path is reported back. In [`ValidationMode::Strict`] the first match
//! rejects the record.
//!
//! Every validated record gets `updatedAt` stamped. `createdAt` is left alone:
//! only the store knows whether a save is an insert.
//!
//! All data comes from the local user. This guards against malformed and
//! pasted input; it is not a security boundary.

use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const DEFAULT_MAX_FIELD_LENGTH: usize = 10_000;

/// Inline attachments are large and opaque; they skip scanning and the
/// length limit.
pub const DEFAULT_EXEMPT_FIELDS: &[&str] = &["resume.data"];

/// Passes over a value in soft mode; nested payloads such as
/// `<scr<script>ipt>` need more than one.
const MAX_STRIP_PASSES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    #[default]
    Soft,
    Strict,
}

struct Pattern {
    name: &'static str,
    regex: Regex,
}

static PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    [
        ("script block", r"(?is)<script\b[^>]*>.*?</script\s*>"),
        ("script tag", r"(?i)</?script\b[^>]*>"),
        ("embedded markup", r"(?i)</?(?:iframe|object|embed|style|link|meta)\b[^>]*>"),
        ("javascript url", r"(?i)javascript\s*:"),
        ("event handler", r#"(?i)<[^>]*\bon[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]*)"#),
        ("sql comment", r"--|/\*|\*/"),
        ("sql terminator", r"';"),
        (
            "sql statement",
            r"(?i)\b(?:union\s+(?:all\s+)?select|drop\s+(?:table|database)|delete\s+from|insert\s+into|truncate\s+table)\b",
        ),
    ]
    .into_iter()
    .map(|(name, pattern)| Pattern {
        name,
        regex: Regex::new(pattern).expect("validator pattern must compile"),
    })
    .collect()
});

/// Error type for validation failures. The message is meant to be shown to
/// the user next to the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The record is not a JSON object
    NotAnObject,
    /// A string exceeds the configured length limit
    TooLong {
        field: String,
        len: usize,
        max: usize,
    },
    /// A string matched an injection pattern (strict mode only)
    Disallowed { field: String, pattern: &'static str },
    /// A field violates a domain rule or does not decode
    Invalid { field: String, message: String },
}

impl ValidationError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::NotAnObject => None,
            ValidationError::TooLong { field, .. }
            | ValidationError::Disallowed { field, .. }
            | ValidationError::Invalid { field, .. } => Some(field),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotAnObject => write!(f, "record must be a JSON object"),
            ValidationError::TooLong { field, len, max } => {
                write!(f, "{} is {} characters long (limit {})", field, len, max)
            }
            ValidationError::Disallowed { field, pattern } => {
                write!(f, "{} contains disallowed content ({})", field, pattern)
            }
            ValidationError::Invalid { field, message } => write!(f, "{} {}", field, message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Outcome of a successful validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub value: Value,
    /// Paths of fields that were altered in soft mode.
    pub sanitized: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SoftValidator {
    mode: ValidationMode,
    max_len: usize,
    exempt: Vec<String>,
}

impl Default for SoftValidator {
    fn default() -> Self {
        Self::new(ValidationMode::Soft, DEFAULT_MAX_FIELD_LENGTH)
    }
}

impl SoftValidator {
    pub fn new(mode: ValidationMode, max_len: usize) -> Self {
        Self {
            mode,
            max_len,
            exempt: DEFAULT_EXEMPT_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_exempt_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exempt = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn validate(&self, value: Value, now: DateTime<Utc>) -> Result<Validated, ValidationError> {
        let Value::Object(mut map) = value else {
            return Err(ValidationError::NotAnObject);
        };

        let mut sanitized = Vec::new();
        for (key, field) in map.iter_mut() {
            self.walk(key.clone(), field, &mut sanitized)?;
        }
        map.insert(
            "updatedAt".to_string(),
            Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );

        Ok(Validated {
            value: Value::Object(map),
            sanitized,
        })
    }

    fn walk(&self, path: String, value: &mut Value, sanitized: &mut Vec<String>) -> Result<(), ValidationError> {
        if self.exempt.iter().any(|e| *e == path) {
            return Ok(());
        }
        match value {
            Value::String(text) => {
                if let Some(clean) = self.check_string(&path, text)? {
                    *text = clean;
                    sanitized.push(path);
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter_mut().enumerate() {
                    self.walk(format!("{}[{}]", path, i), item, sanitized)?;
                }
            }
            Value::Object(map) => {
                for (key, item) in map.iter_mut() {
                    self.walk(format!("{}.{}", path, key), item, sanitized)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Returns the cleaned string when soft mode changed it.
    fn check_string(&self, path: &str, text: &str) -> Result<Option<String>, ValidationError> {
        let len = text.chars().count();
        if len > self.max_len {
            return Err(ValidationError::TooLong {
                field: path.to_string(),
                len,
                max: self.max_len,
            });
        }

        match self.mode {
            ValidationMode::Strict => match first_match(text) {
                Some(pattern) => Err(ValidationError::Disallowed {
                    field: path.to_string(),
                    pattern,
                }),
                None => Ok(None),
            },
            ValidationMode::Soft => {
                if first_match(text).is_none() {
                    return Ok(None);
                }
                Ok(Some(strip(text)))
            }
        }
    }
}

fn first_match(text: &str) -> Option<&'static str> {
    PATTERNS
        .iter()
        .find(|p| p.regex.is_match(text))
        .map(|p| p.name)
}

fn strip(text: &str) -> String {
    let mut current = text.to_string();
    for _ in 0..MAX_STRIP_PASSES {
        let mut next = current.clone();
        for pattern in PATTERNS.iter() {
            next = pattern.regex.replace_all(&next, "").into_owned();
        }
        if next == current {
            break;
        }
        current = next;
    }
    current.trim().to_string()
}
