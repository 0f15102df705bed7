//! Offline recompression of a static tree.
//!
//! Produces the on-disk layout the server consumes: for every original file
//! `P`, sibling variants `P.gz`, `P.br`, `P.zst` created by external
//! compressor executables.
//!
//! # Responsibilities
//! - Walk a directory tree in a deterministic order
//! - Run each configured compressor on eligible originals
//! - Drop variants that turned out no smaller than their original
//! - Remove variants again (all, or only outdated ones) on cleanup
//!
//! # Design Decisions
//! - Compression is delegated to external binaries; nothing is encoded in-process
//! - Synchronous: this is a batch job, there is no request concurrency to serve
//! - The first hard error aborts the run; there is no partial-success contract

mod compressor;
mod error;
mod tree;

pub use compressor::{default_compressors, Compressor};
pub use error::RecompressError;
pub use tree::{cleanup_tree, compress_tree, CleanupOptions, CompressOptions, Summary};
