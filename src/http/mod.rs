//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP / TLS / unix connection
//!     → server.rs (axum setup, graceful shutdown)
//!     → request.rs (assign and propagate x-request-id)
//!     → access_log.rs (time the request, one structured record)
//!     → serve::StaticHandler (negotiate and open)
//!     → serve::response (headers + streamed body)
//! ```

pub mod access_log;
pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{static_router, HttpServer};
