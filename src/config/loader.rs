//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from TOML text without validating it.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Read a TOML file without validating it, for callers that still apply overrides.
pub fn read_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let config = read_config(path)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.listener.bind_address, ":8800");
        assert_eq!(config.serve.root_dir, ".");
        assert_eq!(config.serve.mount_prefix, "/");
        assert_eq!(config.observability.log_format, "json");
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "unix:/run/static.sock"

            [serve]
            root_dir = "/srv/www"
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "unix:/run/static.sock");
        assert_eq!(config.serve.root_dir, "/srv/www");
        assert_eq!(config.serve.mount_prefix, "/");
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn load_reports_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        fs::write(&path, "[serve]\nroot_dir = \"\"\nmount_prefix = \"static\"\n").unwrap();

        match load_config(&path) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        fs::write(&path, "[serve\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_missing_file() {
        let err = load_config(Path::new("/nonexistent/server.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
