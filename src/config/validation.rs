//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Check the listen and metrics addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ServerConfig;
use crate::net::ListenAddress;
use crate::observability::logging::LogFormat;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("serve.root_dir cannot be empty")]
    EmptyRootDir,

    #[error("serve.mount_prefix must start with '/': {0:?}")]
    MountPrefix(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("listener.bind_address is invalid: {0}")]
    BindAddress(String),

    #[error("TLS is not supported on unix socket listeners")]
    TlsOnUnixSocket,

    #[error("observability.log_format is invalid: {0}")]
    LogFormat(String),

    #[error("observability.metrics_address is invalid: {0:?}")]
    MetricsAddress(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.serve.root_dir.is_empty() {
        errors.push(ValidationError::EmptyRootDir);
    }
    if !config.serve.mount_prefix.starts_with('/') {
        errors.push(ValidationError::MountPrefix(config.serve.mount_prefix.clone()));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    match config.listener.bind_address.parse::<ListenAddress>() {
        Ok(ListenAddress::Unix(_)) if config.listener.tls.is_some() => {
            errors.push(ValidationError::TlsOnUnixSocket);
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::BindAddress(e.to_string())),
    }

    if let Err(e) = config.observability.log_format.parse::<LogFormat>() {
        errors.push(ValidationError::LogFormat(e));
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TlsConfig;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = ServerConfig::default();
        config.serve.root_dir.clear();
        config.timeouts.request_secs = 0;
        config.observability.log_format = "xml".into();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::EmptyRootDir));
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::MetricsAddress("nowhere".into())));
    }

    #[test]
    fn tls_requires_tcp() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "unix:/tmp/static.sock".into();
        config.listener.tls = Some(TlsConfig {
            cert_path: "cert.pem".into(),
            key_path: "key.pem".into(),
        });
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::TlsOnUnixSocket])
        );
    }

    #[test]
    fn bad_bind_address() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "unix:".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::BindAddress(_)));
    }
}
