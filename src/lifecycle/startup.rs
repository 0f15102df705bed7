//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Bind the listener and load TLS material
//! - Run the HTTP server until shutdown
//!
//! # Design Decisions
//! - Expects an already validated config and an initialized logger
//! - Fail fast: any startup error is returned to the caller
//! - The listener binds last so traffic only arrives when ready

use std::error::Error;
use std::net::SocketAddr;

use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::{tls::load_tls_config, ListenAddress, Listener};
use crate::observability::metrics;

/// Bring the server up and serve until `shutdown` is triggered.
pub async fn run(config: ServerConfig, shutdown: Shutdown) -> Result<(), Box<dyn Error>> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let address: ListenAddress = config.listener.bind_address.parse()?;
    let tls = match &config.listener.tls {
        Some(tls) => Some(load_tls_config(tls).await?),
        None => None,
    };
    let listener = Listener::bind(&address).await?;

    let mut server = HttpServer::new(config);
    if let Some(tls) = tls {
        server = server.with_tls(tls);
    }
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
