//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! listener.bind_address
//!     → listener.rs (parse tcp/tcp4/tcp6/unix, resolve, bind)
//!     → tls.rs (optional TLS termination, TCP only)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Address syntax accepts a network prefix so one string selects TCP or a unix socket
//! - `:port` means every interface
//! - Admission and concurrency limits are left to the transport

pub mod listener;
pub mod tls;

pub use listener::{AddressFamily, ListenAddress, Listener, ListenerError};
