//! Request server: resolve, negotiate, and stream static resources.
//!
//! # Data Flow
//! ```text
//! request path + Accept-Encoding
//!     → resolve.rs (strip mount prefix, decode, index fallback)
//!     → handler.rs (stat original, sniff content type)
//!     → encoding::select_candidates (ordered candidates)
//!     → variant.rs (per candidate: fresh? smaller?)
//!     → handler.rs (open first eligible variant, else the original)
//!     → response.rs (headers + streamed body)
//! ```
//!
//! # Design Decisions
//! - No state survives a request; the handler only reads from storage
//! - At most one variant is served, the first eligible in rank order
//! - Failures end the request with a status, never the process

pub mod error;
pub mod handler;
pub mod resolve;
pub mod response;
pub mod sniff;
pub mod variant;

pub use error::ServeError;
pub use handler::{Served, StaticHandler};
pub use variant::{check_variant, VariantCheck};

/// File served for directory requests.
pub const INDEX_FILE: &str = "index.html";

/// Content type used when sniffing is impossible.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Number of leading bytes inspected for content-type sniffing.
pub const SNIFF_LEN: usize = 512;
