use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, WaymarkError>;

#[derive(Debug, Error)]
pub enum WaymarkError {
    #[error("malformed matchinfo: {0}")]
    MalformedMatchInfo(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
}

impl WaymarkError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedMatchInfo(_) => "MALFORMED_MATCH_INFO",
            Self::InvariantViolation(_) => "INVARIANT_VIOLATION",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Sqlite(_) => "SQLITE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_payload(&self, operation: impl Into<String>) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    pub(crate) fn mutex_poisoned(resource: &str) -> Self {
        Self::Internal(format!("{resource} mutex poisoned"))
    }
}
