//! Static file server that prefers precompressed variants.
//!
//! For a request whose client accepts a content coding, a sibling file such as
//! `app.js.br` is served in place of `app.js` when it is at least as new and
//! strictly smaller. Otherwise the original is streamed unchanged.
//!
//! The [`serve`] module holds the negotiation and serving engine over any
//! [`storage::Storage`]; [`http`] wires it into an axum service; [`recompress`]
//! produces the variants offline.

pub mod config;
pub mod encoding;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod recompress;
pub mod serve;
pub mod storage;

pub use config::schema::ServerConfig;
pub use encoding::{select_candidates, Encoding};
pub use http::{static_router, HttpServer};
pub use lifecycle::Shutdown;
pub use serve::{ServeError, StaticHandler};
pub use storage::{DirStorage, MemoryStorage, Storage};
