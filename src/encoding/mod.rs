//! Content-coding negotiation.
//!
//! # Data Flow
//! ```text
//! Accept-Encoding header value
//!     → accept.rs (split tokens, drop parameters, keep recognized)
//!     → table.rs (fixed descriptor table, priority rank)
//!     → ordered candidate list (br > zstd > gzip > deflate > compress)
//! ```
//!
//! # Design Decisions
//! - Client quality values are ignored; only the table rank orders candidates
//! - Unknown tokens are dropped silently, never an error
//! - The table is a `static` and never mutated, so concurrent readers need no locks

pub mod accept;
pub mod table;

pub use accept::select_candidates;
pub use table::{Encoding, ENCODINGS};
