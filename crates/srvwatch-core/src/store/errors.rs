use crate::errors::SrvwatchError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Object '{key}' not found")]
    NotFound { key: String },

    #[error("Invalid object key '{key}': {message}")]
    InvalidKey { key: String, message: String },

    #[error("Storage root '{path}' is not a readable directory")]
    RootUnavailable { path: String },

    #[error("Backend '{backend}' is not available in this build (enable the '{backend}' feature)")]
    Unsupported { backend: String },

    #[error("Storage backend error: {message}")]
    Backend { message: String },

    #[error("Storage I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl SrvwatchError for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "STORE_NOT_FOUND",
            StoreError::InvalidKey { .. } => "STORE_INVALID_KEY",
            StoreError::RootUnavailable { .. } => "STORE_ROOT_UNAVAILABLE",
            StoreError::Unsupported { .. } => "STORE_UNSUPPORTED_BACKEND",
            StoreError::Backend { .. } => "STORE_BACKEND_ERROR",
            StoreError::IoError { .. } => "STORE_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidKey { .. }
                | StoreError::RootUnavailable { .. }
                | StoreError::Unsupported { .. }
        )
    }
}
