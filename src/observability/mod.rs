//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and histograms)
//!
//! Per request:
//!     http::access_log → one structured record + request metrics
//!
//! Consumers:
//!     → Log aggregation (stderr, JSON lines by default)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows into the access log
//! - Metrics are cheap (atomic increments) and a no-op until an exporter is installed

pub mod logging;
pub mod metrics;
