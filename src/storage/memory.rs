//! In-memory storage.
//!
//! Directories are implied: a key is a directory when some stored file lives
//! below it. Handy for tests and for embedding generated assets.

use std::collections::HashMap;
use std::io::{self, Cursor};
use std::time::SystemTime;

use bytes::Bytes;

use super::{Resource, Storage};

#[derive(Debug, Clone)]
struct Entry {
    data: Bytes,
    modified: SystemTime,
}

/// A map of keys to file contents and modification times.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: HashMap<String, Entry>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file modified "now".
    pub fn with_file(self, key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.with_file_at(key, data, SystemTime::now())
    }

    /// Add a file with an explicit modification time.
    pub fn with_file_at(
        mut self,
        key: impl Into<String>,
        data: impl Into<Bytes>,
        modified: SystemTime,
    ) -> Self {
        self.insert(key, data, modified);
        self
    }

    /// Insert or replace a file.
    pub fn insert(&mut self, key: impl Into<String>, data: impl Into<Bytes>, modified: SystemTime) {
        self.files.insert(
            key.into(),
            Entry {
                data: data.into(),
                modified,
            },
        );
    }

    fn is_dir(&self, key: &str) -> bool {
        let key = key.trim_end_matches('/');
        if key.is_empty() {
            return true;
        }
        let prefix = format!("{}/", key);
        self.files.keys().any(|k| k.starts_with(&prefix))
    }
}

fn not_found(key: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no such resource: {:?}", key))
}

impl Storage for MemoryStorage {
    type File = Cursor<Bytes>;

    async fn stat(&self, key: &str) -> io::Result<Resource> {
        if let Some(entry) = self.files.get(key) {
            return Ok(Resource {
                size: entry.data.len() as u64,
                modified: entry.modified,
                is_dir: false,
            });
        }
        if self.is_dir(key) {
            return Ok(Resource {
                size: 0,
                modified: SystemTime::UNIX_EPOCH,
                is_dir: true,
            });
        }
        Err(not_found(key))
    }

    async fn open(&self, key: &str) -> io::Result<Self::File> {
        self.files
            .get(key)
            .map(|entry| Cursor::new(entry.data.clone()))
            .ok_or_else(|| not_found(key))
    }
}
