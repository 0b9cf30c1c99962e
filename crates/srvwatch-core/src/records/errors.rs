use crate::errors::SrvwatchError;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Object '{key}' is not valid UTF-8")]
    InvalidUtf8 { key: String },

    #[error("Object '{key}' is not valid JSON: {message}")]
    InvalidJson { key: String, message: String },

    #[error("Object '{key}' must hold a JSON object or an array of objects, found {found}")]
    UnexpectedShape { key: String, found: &'static str },

    #[error("Record {index} in '{key}' is missing required field '{field}'")]
    MissingField {
        key: String,
        index: usize,
        field: &'static str,
    },

    #[error("Record {index} in '{key}' has a server_id of type {found}, expected string or integer")]
    InvalidServerId {
        key: String,
        index: usize,
        found: &'static str,
    },

    #[error("Record {index} in '{key}' has a status of type {found}, expected string")]
    InvalidStatus {
        key: String,
        index: usize,
        found: &'static str,
    },

    #[error("Record {index} in '{key}' has an unparseable timestamp: {value}")]
    InvalidTimestamp {
        key: String,
        index: usize,
        value: String,
    },
}

impl RecordError {
    /// Object key of the document that failed.
    pub fn key(&self) -> &str {
        match self {
            RecordError::InvalidUtf8 { key }
            | RecordError::InvalidJson { key, .. }
            | RecordError::UnexpectedShape { key, .. }
            | RecordError::MissingField { key, .. }
            | RecordError::InvalidServerId { key, .. }
            | RecordError::InvalidStatus { key, .. }
            | RecordError::InvalidTimestamp { key, .. } => key,
        }
    }
}

impl SrvwatchError for RecordError {
    fn error_code(&self) -> &'static str {
        match self {
            RecordError::InvalidUtf8 { .. } => "RECORD_INVALID_UTF8",
            RecordError::InvalidJson { .. } => "RECORD_INVALID_JSON",
            RecordError::UnexpectedShape { .. } => "RECORD_UNEXPECTED_SHAPE",
            RecordError::MissingField { .. } => "RECORD_MISSING_FIELD",
            RecordError::InvalidServerId { .. } => "RECORD_INVALID_SERVER_ID",
            RecordError::InvalidStatus { .. } => "RECORD_INVALID_STATUS",
            RecordError::InvalidTimestamp { .. } => "RECORD_INVALID_TIMESTAMP",
        }
    }
}
