use thiserror::Error;

#[derive(Error, Debug)]
pub enum StaffingError {
    #[error("Malformed query: {field}: {reason}")]
    MalformedQuery { field: String, reason: String },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StaffingError {
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedQuery {
            field:  field.into(),
            reason: reason.into(),
        }
    }
}

pub type StaffingResult<T> = Result<T, StaffingError>;
