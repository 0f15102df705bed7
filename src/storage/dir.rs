//! Storage backed by a directory on the local filesystem.

use std::io;
use std::path::PathBuf;

use super::{Resource, Storage};

/// Serves resources from below a root directory.
#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    /// Create a storage rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a key onto the filesystem, refusing anything that could escape the root.
    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        let mut path = self.root.clone();
        for segment in key.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(escape_error(key)),
                s if s.contains('\\') || s.contains('\0') => return Err(escape_error(key)),
                s => path.push(s),
            }
        }
        Ok(path)
    }
}

fn escape_error(key: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("key escapes storage root: {:?}", key),
    )
}

impl Storage for DirStorage {
    type File = tokio::fs::File;

    async fn stat(&self, key: &str) -> io::Result<Resource> {
        let meta = tokio::fs::metadata(self.path_for(key)?).await?;
        Ok(Resource {
            size: meta.len(),
            modified: meta.modified()?,
            is_dir: meta.is_dir(),
        })
    }

    async fn open(&self, key: &str) -> io::Result<Self::File> {
        tokio::fs::File::open(self.path_for(key)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn stat_and_open_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/a.txt"), "abc").unwrap();

        let storage = DirStorage::new(dir.path());
        let res = storage.stat("sub/a.txt").await.unwrap();
        assert_eq!(res.size, 3);
        assert!(!res.is_dir);
        assert!(storage.stat("sub").await.unwrap().is_dir);

        let mut contents = String::new();
        storage
            .open("sub/a.txt")
            .await
            .unwrap()
            .read_to_string(&mut contents)
            .await
            .unwrap();
        assert_eq!(contents, "abc");
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirStorage::new(dir.path());
        let err = storage.stat("nope.txt").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn parent_segments_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirStorage::new(dir.path().join("root"));
        std::fs::write(dir.path().join("secret"), "x").unwrap();
        assert!(storage.stat("../secret").await.is_err());
        assert!(storage.open("a/../../secret").await.is_err());
    }
}
