//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use filetime::FileTime;
use http_body_util::BodyExt;
use precompressed_server::config::ServerConfig;
use precompressed_server::storage::Resource;
use precompressed_server::{HttpServer, MemoryStorage, Storage};
use tempfile::TempDir;
use tower::ServiceExt;

/// A temporary directory tree served or recompressed by a test.
pub struct Tree {
    pub dir: TempDir,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `rel` (creating parent directories) and return its absolute path.
    pub fn write(&self, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    /// Like [`Tree::write`], with an explicit modification time.
    pub fn write_at(&self, rel: &str, contents: impl AsRef<[u8]>, mtime: SystemTime) -> PathBuf {
        let path = self.write(rel, contents);
        set_mtime(&path, mtime);
        path
    }

    pub fn mkdir(&self, rel: &str) {
        fs::create_dir_all(self.dir.path().join(rel)).unwrap();
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.dir.path().join(rel).exists()
    }

    pub fn read(&self, rel: &str) -> Vec<u8> {
        fs::read(self.dir.path().join(rel)).unwrap()
    }

    /// Config serving this tree at `/`.
    pub fn config(&self) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.serve.root_dir = self.dir.path().to_string_lossy().into_owned();
        config
    }

    /// Fully layered router serving this tree.
    pub fn router(&self) -> Router {
        HttpServer::new(self.config()).router()
    }
}

pub fn set_mtime(path: &Path, mtime: SystemTime) {
    filetime::set_file_mtime(path, FileTime::from_system_time(mtime)).unwrap();
}

/// A fixed point in time, safely in the past, on a whole second.
pub fn base_time() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

/// Send a GET with an optional `Accept-Encoding` through `app`.
pub async fn get(app: Router, path: &str, accept_encoding: Option<&str>) -> Response<Body> {
    let mut req = Request::get(path);
    if let Some(ae) = accept_encoding {
        req = req.header("accept-encoding", ae);
    }
    app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

/// Memory storage whose `open` fails for one key although `stat` succeeds.
pub struct BrokenOpen {
    pub inner: MemoryStorage,
    pub broken: &'static str,
}

impl Storage for BrokenOpen {
    type File = <MemoryStorage as Storage>::File;

    async fn stat(&self, key: &str) -> io::Result<Resource> {
        self.inner.stat(key).await
    }

    async fn open(&self, key: &str) -> io::Result<Self::File> {
        if key == self.broken {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        }
        self.inner.open(key).await
    }
}

/// Memory storage whose `stat` takes `delay` to answer.
pub struct SlowStorage {
    pub inner: MemoryStorage,
    pub delay: Duration,
}

impl Storage for SlowStorage {
    type File = <MemoryStorage as Storage>::File;

    async fn stat(&self, key: &str) -> io::Result<Resource> {
        tokio::time::sleep(self.delay).await;
        self.inner.stat(key).await
    }

    async fn open(&self, key: &str) -> io::Result<Self::File> {
        self.inner.open(key).await
    }
}

/// JSON log lines written by a thread-local subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    /// Route events on the current thread into this buffer until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::INFO)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Lines whose message is exactly `message`.
    pub fn records(&self, message: &str) -> Vec<String> {
        let needle = format!("\"message\":\"{}\"", message);
        let raw = self.0.lock().unwrap().clone();
        String::from_utf8_lossy(&raw)
            .lines()
            .filter(|line| line.contains(&needle))
            .map(str::to_string)
            .collect()
    }
}
