use crate::config::types::{SourceBackend, WatchConfig};
use crate::errors::ConfigError;

pub const VALID_BACKENDS: [&str; 2] = ["local", "s3"];

/// Validate a fully merged configuration.
pub fn validate_config(config: &WatchConfig) -> Result<(), ConfigError> {
    let backend = config.source.backend_kind()?;

    if backend == SourceBackend::S3
        && config
            .source
            .bucket
            .as_deref()
            .is_none_or(|b| b.trim().is_empty())
    {
        return Err(ConfigError::InvalidConfiguration {
            message: "source.bucket is required when source.backend = \"s3\"".to_string(),
        });
    }

    if config.source.suffix().is_empty() {
        return Err(ConfigError::InvalidConfiguration {
            message: "source.suffix must not be empty".to_string(),
        });
    }

    if config.refresh.interval_secs == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "refresh.interval_secs must be at least 1".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{RefreshConfig, SourceConfig};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&WatchConfig::default()).is_ok());
    }

    #[test]
    fn test_s3_requires_bucket() {
        let config = WatchConfig {
            source: SourceConfig {
                backend: Some("s3".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("source.bucket is required"));

        let config = WatchConfig {
            source: SourceConfig {
                backend: Some("s3".to_string()),
                bucket: Some("ops-status".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = WatchConfig {
            refresh: RefreshConfig {
                interval_secs: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_zero_ttl_allowed() {
        let config = WatchConfig {
            refresh: RefreshConfig {
                cache_ttl_secs: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_suffix_rejected() {
        let config = WatchConfig {
            source: SourceConfig {
                suffix: Some(String::new()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let config = WatchConfig {
            source: SourceConfig {
                backend: Some("ftp".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidBackend { .. })
        ));
        assert!(!VALID_BACKENDS.contains(&"ftp"));
    }
}
