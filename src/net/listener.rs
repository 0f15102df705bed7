//! Listen address parsing and socket binding.
//!
//! # Responsibilities
//! - Parse `unix:/path`, `tcp:addr`, `tcp4:addr`, `tcp6:addr` and bare `addr`
//! - Resolve host names and honor the requested address family
//! - Bind a TCP or unix listener

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use tokio::net::TcpListener;
#[cfg(unix)]
use tokio::net::UnixListener;

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// The address string could not be parsed.
    #[error("invalid listen address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: &'static str },

    /// Name resolution produced no address of the requested family.
    #[error("no {family} address found for {address}")]
    NoAddress {
        address: String,
        family: AddressFamily,
    },

    /// Failed to bind to address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Unix sockets are not available on this platform.
    #[error("unix sockets are not supported on this platform")]
    UnixUnsupported,

    /// Certificate or key could not be loaded.
    #[error("failed to load TLS material: {0}")]
    Tls(#[source] std::io::Error),
}

/// IP family restriction of a TCP listen address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Any,
    V4,
    V6,
}

impl AddressFamily {
    fn accepts(&self, addr: &SocketAddr) -> bool {
        match self {
            AddressFamily::Any => true,
            AddressFamily::V4 => addr.is_ipv4(),
            AddressFamily::V6 => addr.is_ipv6(),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddressFamily::Any => "IP",
            AddressFamily::V4 => "IPv4",
            AddressFamily::V6 => "IPv6",
        })
    }
}

/// A parsed listen address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenAddress {
    /// `host:port` to resolve, restricted to `family`.
    Tcp { address: String, family: AddressFamily },
    /// Path of a unix domain socket.
    Unix(PathBuf),
}

impl FromStr for ListenAddress {
    type Err = ListenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| ListenerError::InvalidAddress {
            address: s.to_string(),
            reason,
        };

        let (family, rest) = match s.split_once(':') {
            Some(("unix", path)) => {
                if path.is_empty() {
                    return Err(invalid("empty socket path"));
                }
                return Ok(ListenAddress::Unix(PathBuf::from(path)));
            }
            Some(("tcp", rest)) => (AddressFamily::Any, rest),
            Some(("tcp4", rest)) => (AddressFamily::V4, rest),
            Some(("tcp6", rest)) => (AddressFamily::V6, rest),
            _ => (AddressFamily::Any, s),
        };

        let (host, port) = rest.rsplit_once(':').ok_or_else(|| invalid("missing port"))?;
        port.parse::<u16>().map_err(|_| invalid("bad port"))?;

        let address = if host.is_empty() {
            match family {
                AddressFamily::V6 => format!("[::]:{}", port),
                _ => format!("0.0.0.0:{}", port),
            }
        } else {
            rest.to_string()
        };
        Ok(ListenAddress::Tcp { address, family })
    }
}

impl fmt::Display for ListenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenAddress::Tcp { address, .. } => f.write_str(address),
            ListenAddress::Unix(path) => write!(f, "unix:{}", path.display()),
        }
    }
}

/// A bound listener, ready to hand to the HTTP server.
#[derive(Debug)]
pub enum Listener {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix(UnixListener),
}

impl Listener {
    /// Resolve and bind `address`.
    pub async fn bind(address: &ListenAddress) -> Result<Self, ListenerError> {
        match address {
            ListenAddress::Tcp { address, family } => {
                let bind_err = |source| ListenerError::Bind {
                    address: address.clone(),
                    source,
                };
                let addr = tokio::net::lookup_host(address.as_str())
                    .await
                    .map_err(bind_err)?
                    .find(|a| family.accepts(a))
                    .ok_or_else(|| ListenerError::NoAddress {
                        address: address.clone(),
                        family: *family,
                    })?;
                let listener = TcpListener::bind(addr).await.map_err(bind_err)?;
                tracing::info!(address = %addr, "Listener bound");
                Ok(Listener::Tcp(listener))
            }
            #[cfg(unix)]
            ListenAddress::Unix(path) => {
                let listener = UnixListener::bind(path).map_err(|source| ListenerError::Bind {
                    address: path.display().to_string(),
                    source,
                })?;
                tracing::info!(path = %path.display(), "Listener bound");
                Ok(Listener::Unix(listener))
            }
            #[cfg(not(unix))]
            ListenAddress::Unix(_) => Err(ListenerError::UnixUnsupported),
        }
    }

    /// Wrap an already bound TCP listener.
    pub fn from_tcp(listener: TcpListener) -> Self {
        Listener::Tcp(listener)
    }

    /// Human-readable local address.
    pub fn local_addr(&self) -> String {
        match self {
            Listener::Tcp(l) => l
                .local_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| "unknown".to_string()),
            #[cfg(unix)]
            Listener::Unix(l) => l
                .local_addr()
                .ok()
                .and_then(|a| a.as_pathname().map(|p| format!("unix:{}", p.display())))
                .unwrap_or_else(|| "unix:unnamed".to_string()),
        }
    }
}
