//! Precompressed static file server.
//!
//! Serves a directory over HTTP and, when the client accepts it, substitutes a
//! fresh, smaller precompressed sibling (`.br`, `.zst`, `.gz`, `.deflate`, `.Z`)
//! for the requested file.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ net::listener ──▶ http::server ──▶ http::access_log
//!                                                            │
//!                                                            ▼
//!                                      encoding ◀── serve::StaticHandler ──▶ storage
//!                                                            │
//!     Client Response                                        ▼
//!     ◀───────────────────────────────────────────── serve::response (stream)
//! ```

use std::path::PathBuf;

use clap::Parser;
use precompressed_server::config::{read_config, validate_config, ConfigError, ServerConfig};
use precompressed_server::lifecycle::{signals, startup, Shutdown};
use precompressed_server::observability::logging::{self, LogFormat};

#[derive(Parser)]
#[command(name = "precompressed-server")]
#[command(about = "Serve static files, preferring precompressed variants", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (host:port, :port, tcp4:…, tcp6:…, unix:/path)
    #[arg(short, long)]
    listen: Option<String>,

    /// Directory to serve
    #[arg(short, long)]
    dir: Option<String>,

    /// Path prefix the content is mounted under
    #[arg(long)]
    prefix: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(listen) = &self.listen {
            config.listener.bind_address = listen.clone();
        }
        if let Some(dir) = &self.dir {
            config.serve.root_dir = dir.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.serve.mount_prefix = prefix.clone();
        }
        if self.verbose {
            config.observability.log_level = "debug".to_string();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => ServerConfig::default(),
    };
    cli.apply(&mut config);

    let format = config
        .observability
        .log_format
        .parse()
        .unwrap_or(LogFormat::Json);
    logging::init(&config.observability.log_level, format);

    if let Err(errors) = validate_config(&config) {
        let err = ConfigError::Validation(errors);
        tracing::error!(error = %err, "Invalid configuration");
        return Err(err.into());
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        root_dir = %config.serve.root_dir,
        "precompressed-server starting"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    if let Err(e) = startup::run(config, shutdown).await {
        tracing::error!(error = %e, "Server error");
        return Err(e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
