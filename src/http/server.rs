//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router around the static handler
//! - Wire up middleware (request id, timeout, access log)
//! - Serve on a TCP, TLS or unix listener
//! - Stop gracefully when the shutdown signal fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServerConfig;
use crate::http::access_log::access_log;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::shutdown;
use crate::net::Listener;
use crate::serve::StaticHandler;
use crate::storage::{DirStorage, Storage};

/// Grace period for in-flight TLS connections after shutdown is triggered.
const TLS_DRAIN_SECS: u64 = 30;

/// Router serving every path through `handler`.
///
/// This is the embedding surface: applications can merge or nest it into their
/// own router. When nesting, axum strips the nest path, so keep the handler's
/// mount prefix at `/`; when merging, set the mount prefix to the served path.
pub fn static_router<S: Storage>(handler: StaticHandler<S>) -> Router {
    Router::new()
        .route("/", any(serve_static::<S>))
        .route("/{*path}", any(serve_static::<S>))
        .with_state(Arc::new(handler))
}

async fn serve_static<S: Storage>(
    State(handler): State<Arc<StaticHandler<S>>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let accept_encoding = headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    match handler.serve(uri.path(), accept_encoding).await {
        Ok(served) => served.into_response(),
        Err(e) => e.into_response(),
    }
}

/// HTTP server for static content.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    tls: Option<RustlsConfig>,
}

impl HttpServer {
    /// Create a server for `config.serve.root_dir` on the local filesystem.
    pub fn new(config: ServerConfig) -> Self {
        let handler = StaticHandler::new(DirStorage::new(&config.serve.root_dir))
            .with_mount_prefix(config.serve.mount_prefix.clone());
        Self::with_handler(config, handler)
    }

    /// Create a server around an arbitrary handler.
    pub fn with_handler<S: Storage>(config: ServerConfig, handler: StaticHandler<S>) -> Self {
        let router = Self::build_router(&config, handler);
        Self {
            router,
            config,
            tls: None,
        }
    }

    /// Terminate TLS on TCP listeners.
    pub fn with_tls(mut self, tls: RustlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Build the axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router<S: Storage>(config: &ServerConfig, handler: StaticHandler<S>) -> Router {
        static_router(handler)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            // Outside the timeout so timed-out requests are still logged.
            .layer(middleware::from_fn(access_log))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, e.g. for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: Listener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(
            address = %listener.local_addr(),
            root_dir = %self.config.serve.root_dir,
            mount_prefix = %self.config.serve.mount_prefix,
            tls = self.tls.is_some(),
            "HTTP server starting"
        );

        match (listener, self.tls) {
            (Listener::Tcp(listener), None) => {
                let app = self
                    .router
                    .into_make_service_with_connect_info::<SocketAddr>();
                axum::serve(listener, app)
                    .with_graceful_shutdown(shutdown::recv(shutdown))
                    .await?;
            }
            (Listener::Tcp(listener), Some(tls)) => {
                let handle = axum_server::Handle::new();
                let drain = handle.clone();
                tokio::spawn(async move {
                    shutdown::recv(shutdown).await;
                    drain.graceful_shutdown(Some(Duration::from_secs(TLS_DRAIN_SECS)));
                });
                axum_server::from_tcp_rustls(listener.into_std()?, tls)
                    .handle(handle)
                    .serve(
                        self.router
                            .into_make_service_with_connect_info::<SocketAddr>(),
                    )
                    .await?;
            }
            #[cfg(unix)]
            (Listener::Unix(listener), _) => {
                axum::serve(listener, self.router.into_make_service())
                    .with_graceful_shutdown(shutdown::recv(shutdown))
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn server(storage: MemoryStorage) -> HttpServer {
        HttpServer::with_handler(ServerConfig::default(), StaticHandler::new(storage))
    }

    #[tokio::test]
    async fn serves_through_middleware() {
        let app = server(MemoryStorage::new().with_file("test.txt", "Hello, World!")).router();
        let response = app
            .oneshot(Request::get("/test.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()[header::VARY], "Accept-Encoding");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Hello, World!");
    }

    #[tokio::test]
    async fn client_request_id_is_echoed() {
        let app = server(MemoryStorage::new()).router();
        let response = app
            .oneshot(
                Request::get("/missing")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }
}
