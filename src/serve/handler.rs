//! Static request handler.
//!
//! # Responsibilities
//! - Resolve the request path to a storage key
//! - Stat the original and sniff its content type
//! - Walk the negotiated candidates and pick the first eligible variant
//! - Fall back to the original when nothing qualifies
//!
//! # Design Decisions
//! - Storage is generic so the same logic runs over disk or memory
//! - Candidate misses, stale and oversized variants are logged and skipped
//! - An open failure after a successful stat is an internal error

use tokio::io::AsyncReadExt;

use crate::encoding::{select_candidates, Encoding};
use crate::observability::metrics;
use crate::storage::Storage;

use super::resolve::resolve_path;
use super::sniff::detect_content_type;
use super::variant::{check_variant, VariantCheck};
use super::{ServeError, FALLBACK_CONTENT_TYPE, SNIFF_LEN};

/// Serves resources from a [`Storage`], preferring precompressed variants.
#[derive(Debug, Clone)]
pub struct StaticHandler<S> {
    storage: S,
    mount_prefix: String,
}

/// The resource chosen for one request, opened and ready to stream.
#[derive(Debug)]
pub struct Served<F> {
    /// Storage key of the original resource.
    pub key: String,
    /// Open handle of the resource actually sent (variant or original).
    pub file: F,
    /// Sniffed content type of the original.
    pub content_type: &'static str,
    /// Size of the body that will be sent.
    pub content_length: u64,
    /// Chosen variant's coding, `None` when the original is sent.
    pub encoding: Option<&'static Encoding>,
}

impl<S: Storage> StaticHandler<S> {
    /// Create a handler mounted at `/`.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            mount_prefix: "/".to_string(),
        }
    }

    /// Serve below `prefix` instead of `/`. The prefix is stripped before lookup.
    pub fn with_mount_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.mount_prefix = prefix.into();
        self
    }

    /// Pick and open the best representation of `request_path`.
    pub async fn serve(
        &self,
        request_path: &str,
        accept_encoding: &str,
    ) -> Result<Served<S::File>, ServeError> {
        let key = resolve_path(request_path, &self.mount_prefix)?;

        let original = match self.storage.stat(&key).await {
            Ok(res) if !res.is_dir => res,
            Ok(_) => {
                tracing::debug!(path = %key, "Directory requested without trailing slash");
                return Err(ServeError::NotFound { path: key });
            }
            Err(e) => {
                tracing::debug!(path = %key, error = %e, "Stat failed");
                return Err(ServeError::NotFound { path: key });
            }
        };

        let content_type = self.sniff(&key).await;

        for encoding in select_candidates(accept_encoding) {
            let variant_key = encoding.variant_key(&key);
            let Ok(variant) = self.storage.stat(&variant_key).await else {
                continue;
            };
            if variant.is_dir {
                continue;
            }

            let check = check_variant(&original, &variant);
            metrics::record_variant_decision(encoding, check);
            match check {
                VariantCheck::Stale => {
                    tracing::warn!(
                        path = %key,
                        ext = encoding.suffix,
                        diff = ?original.modified.duration_since(variant.modified).unwrap_or_default(),
                        "Encoded file is older than original"
                    );
                }
                VariantCheck::NotSmaller => {
                    tracing::info!(
                        path = %key,
                        ext = encoding.suffix,
                        original = original.size,
                        encoded = variant.size,
                        "Encoded file is not smaller than original, skip"
                    );
                }
                VariantCheck::Fresh => {
                    let file = self.open(&key, &variant_key).await?;
                    tracing::debug!(path = %key, ext = encoding.suffix, "Serving encoded file");
                    return Ok(Served {
                        key,
                        file,
                        content_type,
                        content_length: variant.size,
                        encoding: Some(encoding),
                    });
                }
            }
        }

        let file = self.open(&key, &key).await?;
        Ok(Served {
            content_length: original.size,
            key,
            file,
            content_type,
            encoding: None,
        })
    }

    async fn open(&self, key: &str, open_key: &str) -> Result<S::File, ServeError> {
        self.storage.open(open_key).await.map_err(|e| {
            tracing::error!(path = %key, file = %open_key, error = %e, "Open failed");
            ServeError::Internal {
                path: open_key.to_string(),
                source: e,
            }
        })
    }

    /// Sniff the original's content type; any failure degrades to octet-stream.
    async fn sniff(&self, key: &str) -> &'static str {
        let file = match self.storage.open(key).await {
            Ok(f) => f,
            Err(e) => {
                tracing::error!(path = %key, error = %e, "Open for content-type failed");
                return FALLBACK_CONTENT_TYPE;
            }
        };
        let mut head = Vec::with_capacity(SNIFF_LEN);
        match file.take(SNIFF_LEN as u64).read_to_end(&mut head).await {
            Ok(_) => detect_content_type(&head),
            Err(e) => {
                tracing::error!(path = %key, error = %e, "Read for content-type failed");
                FALLBACK_CONTENT_TYPE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::time::{Duration, SystemTime};
    use tokio::io::AsyncReadExt;

    async fn body<F: tokio::io::AsyncRead + Unpin>(mut served: Served<F>) -> String {
        let mut out = String::new();
        served.file.read_to_string(&mut out).await.unwrap();
        out
    }

    /// Memory storage whose `open` fails for one key although `stat` succeeds.
    struct BrokenOpen {
        inner: MemoryStorage,
        broken: &'static str,
    }

    impl Storage for BrokenOpen {
        type File = <MemoryStorage as Storage>::File;

        async fn stat(&self, key: &str) -> std::io::Result<crate::storage::Resource> {
            self.inner.stat(key).await
        }

        async fn open(&self, key: &str) -> std::io::Result<Self::File> {
            if key == self.broken {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "permission denied",
                ));
            }
            self.inner.open(key).await
        }
    }

    #[tokio::test]
    async fn variant_open_failure_is_internal() {
        let handler = StaticHandler::new(BrokenOpen {
            inner: MemoryStorage::new()
                .with_file("a.txt", "original content here")
                .with_file("a.txt.gz", "gz"),
            broken: "a.txt.gz",
        });

        let err = handler.serve("/a.txt", "gzip").await.unwrap_err();
        match &err {
            ServeError::Internal { path, .. } => assert_eq!(path, "a.txt.gz"),
            other => panic!("expected internal error, got {other:?}"),
        }
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        // Without negotiation the original is still served.
        assert_eq!(
            body(handler.serve("/a.txt", "").await.unwrap()).await,
            "original content here"
        );
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let handler = StaticHandler::new(MemoryStorage::new());
        let err = handler.serve("/missing.txt", "").await.unwrap_err();
        assert!(matches!(err, ServeError::NotFound { .. }));
    }

    #[tokio::test]
    async fn plain_file_without_encoding() {
        let handler = StaticHandler::new(MemoryStorage::new().with_file("test.txt", "Hello, World!"));
        let served = handler.serve("/test.txt", "").await.unwrap();
        assert_eq!(served.content_length, 13);
        assert!(served.encoding.is_none());
        assert_eq!(served.content_type, "text/plain; charset=utf-8");
        assert_eq!(body(served).await, "Hello, World!");
    }

    #[tokio::test]
    async fn index_fallback() {
        let storage = MemoryStorage::new()
            .with_file("index.html", "<html>Home</html>")
            .with_file("dir/index.html", "<html>Dir</html>");
        let handler = StaticHandler::new(storage);

        let served = handler.serve("/", "").await.unwrap();
        assert_eq!(served.content_type, "text/html; charset=utf-8");
        assert_eq!(body(served).await, "<html>Home</html>");
        assert_eq!(body(handler.serve("/dir/", "").await.unwrap()).await, "<html>Dir</html>");
    }

    #[tokio::test]
    async fn directory_without_index_is_not_found() {
        let handler = StaticHandler::new(MemoryStorage::new().with_file("dir/a.txt", "a"));
        assert!(matches!(
            handler.serve("/dir/", "").await,
            Err(ServeError::NotFound { .. })
        ));
        assert!(matches!(
            handler.serve("/dir", "").await,
            Err(ServeError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn prefers_valid_variant() {
        let storage = MemoryStorage::new()
            .with_file("test.txt", "original content here")
            .with_file("test.txt.gz", "compressed gz");
        let handler = StaticHandler::new(storage);
        let served = handler.serve("/test.txt", "gzip").await.unwrap();
        assert_eq!(served.encoding.unwrap().content_encoding, "gzip");
        assert_eq!(served.content_length, 13);
        // Content type describes the original, not the gzip bytes.
        assert_eq!(served.content_type, "text/plain; charset=utf-8");
        assert_eq!(body(served).await, "compressed gz");
    }

    #[tokio::test]
    async fn larger_variant_is_skipped() {
        let storage = MemoryStorage::new()
            .with_file("small.txt", "x")
            .with_file("small.txt.gz", "much longer than the original");
        let handler = StaticHandler::new(storage);
        let served = handler.serve("/small.txt", "gzip").await.unwrap();
        assert!(served.encoding.is_none());
        assert_eq!(body(served).await, "x");
    }

    #[tokio::test]
    async fn stale_variant_falls_through_to_next_candidate() {
        let now = SystemTime::now();
        let storage = MemoryStorage::new()
            .with_file_at("app.js", "console.log('original');", now)
            .with_file_at("app.js.br", "old br", now - Duration::from_secs(60))
            .with_file_at("app.js.gz", "new gz", now);
        let handler = StaticHandler::new(storage);
        let served = handler.serve("/app.js", "br, gzip").await.unwrap();
        assert_eq!(served.encoding.unwrap().token, "gzip");
        assert_eq!(body(served).await, "new gz");
    }

    #[tokio::test]
    async fn rank_beats_header_order() {
        let storage = MemoryStorage::new()
            .with_file("test.txt", "original content that is long enough")
            .with_file("test.txt.br", "br")
            .with_file("test.txt.gz", "gz");
        let handler = StaticHandler::new(storage);
        let served = handler.serve("/test.txt", "gzip, br").await.unwrap();
        assert_eq!(served.encoding.unwrap().token, "br");
        assert_eq!(body(served).await, "br");
    }

    #[tokio::test]
    async fn mount_prefix_is_stripped() {
        let handler = StaticHandler::new(MemoryStorage::new().with_file("app.css", "body{}"))
            .with_mount_prefix("/static/");
        assert!(handler.serve("/static/app.css", "").await.is_ok());
        assert!(matches!(
            handler.serve("/app.css", "").await,
            Err(ServeError::NotFound { .. })
        ));
    }
}
