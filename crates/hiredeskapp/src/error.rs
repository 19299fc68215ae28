use crate::model::Namespace;
use crate::validate::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HireError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Record not found: {namespace}/{id}")]
    NotFound { namespace: Namespace, id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Unknown namespace: {0}")]
    UnknownNamespace(String),
}

pub type Result<T> = std::result::Result<T, HireError>;
