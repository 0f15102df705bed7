//! TLS configuration and certificate loading.

use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsConfig;
use crate::net::ListenerError;

/// Load TLS configuration from the configured certificate and key files.
pub async fn load_tls_config(config: &TlsConfig) -> Result<RustlsConfig, ListenerError> {
    let cert_path = Path::new(&config.cert_path);
    let key_path = Path::new(&config.key_path);

    for (what, path) in [("Certificate", cert_path), ("Private key", key_path)] {
        if !path.exists() {
            return Err(ListenerError::Tls(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} file not found: {:?}", what, path),
            )));
        }
    }

    RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(ListenerError::Tls)
}
