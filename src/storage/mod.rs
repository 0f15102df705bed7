//! Read-only resource storage.
//!
//! # Responsibilities
//! - Stat and open resources addressed by a clean relative key
//! - Hide whether a key names an original or a precompressed variant
//!
//! # Design Decisions
//! - Keys are `/`-separated, relative, and already sanitized by the caller
//! - One capability (`stat` + `open`) serves both originals and variants;
//!   a variant is just the original key plus a suffix
//! - Opened handles are owned by a single request and closed on drop

pub mod dir;
pub mod memory;

use std::future::Future;
use std::io;
use std::time::SystemTime;

use tokio::io::AsyncRead;

pub use dir::DirStorage;
pub use memory::MemoryStorage;

/// Metadata of a stored resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// Whether the key names a directory rather than a file.
    pub is_dir: bool,
}

/// A source of resources the server can stat and stream.
pub trait Storage: Send + Sync + 'static {
    /// Handle returned by [`Storage::open`].
    type File: AsyncRead + Send + Unpin + 'static;

    /// Fetch metadata for `key`.
    fn stat(&self, key: &str) -> impl Future<Output = io::Result<Resource>> + Send;

    /// Open `key` for reading.
    fn open(&self, key: &str) -> impl Future<Output = io::Result<Self::File>> + Send;
}
