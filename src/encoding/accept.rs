//! `Accept-Encoding` parsing.
//!
//! Parameters such as `;q=0.5` are discarded: candidates are ordered by the
//! server's fixed rank, not by client weights. A `q=0` entry is therefore still
//! treated as acceptable.

use super::table::Encoding;

/// Parse a raw `Accept-Encoding` value into the recognized codings, ordered by rank.
///
/// Tokens match ASCII case-insensitively, as content codings are defined to be,
/// so `GZIP` selects gzip here even though an exact-match lookup would drop it.
/// Repeated tokens are kept once per occurrence; the sort is stable.
pub fn select_candidates(header: &str) -> Vec<&'static Encoding> {
    let mut candidates: Vec<&'static Encoding> = header
        .split(',')
        .filter_map(|item| {
            let token = item.split(';').next().unwrap_or_default().trim();
            Encoding::from_token(token)
        })
        .collect();
    candidates.sort_by_key(|e| e.rank);
    candidates
}
