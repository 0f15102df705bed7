//! Request path to storage key resolution.
//!
//! # Responsibilities
//! - Strip the mount prefix the handler is served under
//! - Percent-decode the remainder
//! - Apply the directory-index fallback
//! - Refuse traversal outside the storage root
//!
//! # Design Decisions
//! - A path outside the mount prefix is simply not found
//! - `..` segments are rejected rather than normalized

use percent_encoding::percent_decode_str;

use super::{ServeError, INDEX_FILE};

/// Turn a request path into a clean storage key.
pub fn resolve_path(request_path: &str, mount_prefix: &str) -> Result<String, ServeError> {
    let not_found = || ServeError::NotFound {
        path: request_path.to_string(),
    };

    let rest = request_path.strip_prefix(mount_prefix).ok_or_else(not_found)?;
    let decoded = percent_decode_str(rest)
        .decode_utf8()
        .map_err(|_| not_found())?;

    let wants_index = decoded.is_empty() || decoded.ends_with('/');

    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(not_found()),
            s if s.contains('\0') || s.contains('\\') => return Err(not_found()),
            s => segments.push(s),
        }
    }
    if wants_index {
        segments.push(INDEX_FILE);
    }
    Ok(segments.join("/"))
}
