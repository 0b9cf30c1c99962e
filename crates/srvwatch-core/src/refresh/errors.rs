use crate::errors::SrvwatchError;
use crate::records::RecordError;
use crate::store::StoreError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Could not list '{prefix}' in {location}: {source}")]
    SourceUnavailable {
        location: String,
        prefix: String,
        #[source]
        source: StoreError,
    },

    #[error("No objects ending in '{suffix}' found under '{prefix}' in {location}")]
    NoMatchingObjects {
        location: String,
        prefix: String,
        suffix: String,
    },

    #[error("Failed to read object '{key}': {source}")]
    ObjectReadFailed {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("Failed to parse records: {source}")]
    RecordParseFailure {
        #[from]
        source: RecordError,
    },
}

/// How loudly a failed fetch is shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl FetchError {
    /// Missing data is a warning; unreadable data is an error.
    pub fn severity(&self) -> Severity {
        match self {
            FetchError::SourceUnavailable { .. } | FetchError::NoMatchingObjects { .. } => {
                Severity::Warning
            }
            FetchError::ObjectReadFailed { .. } | FetchError::RecordParseFailure { .. } => {
                Severity::Error
            }
        }
    }
}

impl SrvwatchError for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            FetchError::SourceUnavailable { .. } => "FETCH_SOURCE_UNAVAILABLE",
            FetchError::NoMatchingObjects { .. } => "FETCH_NO_MATCHING_OBJECTS",
            FetchError::ObjectReadFailed { .. } => "FETCH_OBJECT_READ_FAILED",
            FetchError::RecordParseFailure { .. } => "FETCH_RECORD_PARSE_FAILURE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_split() {
        let missing = FetchError::NoMatchingObjects {
            location: "memory://".to_string(),
            prefix: "raw/".to_string(),
            suffix: ".json".to_string(),
        };
        assert_eq!(missing.severity(), Severity::Warning);
        assert_eq!(missing.error_code(), "FETCH_NO_MATCHING_OBJECTS");
        assert_eq!(
            missing.to_string(),
            "No objects ending in '.json' found under 'raw/' in memory://"
        );

        let parse = FetchError::from(RecordError::InvalidUtf8 {
            key: "raw/a.json".to_string(),
        });
        assert_eq!(parse.severity(), Severity::Error);
        assert_eq!(
            parse.to_string(),
            "Failed to parse records: Object 'raw/a.json' is not valid UTF-8"
        );
    }
}
