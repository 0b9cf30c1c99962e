use std::error::Error;

/// Base trait for all srvwatch errors
pub trait SrvwatchError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {message}")]
    ConfigParseError { path: String, message: String },

    #[error("Invalid backend '{backend}'. Supported backends: local, s3")]
    InvalidBackend { backend: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl ConfigError {
    /// Missing config files are expected and not reported.
    pub fn is_file_not_found(&self) -> bool {
        matches!(
            self,
            ConfigError::ReadFailed { source, .. }
                if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

impl SrvwatchError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ReadFailed { .. } => "CONFIG_READ_FAILED",
            ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidBackend { .. } => "INVALID_BACKEND",
            ConfigError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ConfigParseError { .. }
                | ConfigError::InvalidBackend { .. }
                | ConfigError::InvalidConfiguration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_backend_display() {
        let error = ConfigError::InvalidBackend {
            backend: "ftp".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid backend 'ftp'. Supported backends: local, s3"
        );
        assert_eq!(error.error_code(), "INVALID_BACKEND");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_read_failed_not_found() {
        let error = ConfigError::ReadFailed {
            path: "/nope/config.toml".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(error.is_file_not_found());
        assert!(!error.is_user_error());

        let error = ConfigError::ReadFailed {
            path: "/nope/config.toml".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!error.is_file_not_found());
    }
}
