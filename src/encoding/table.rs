//! Fixed table of supported content codings.

use std::path::Path;

/// A precompression scheme the server knows how to serve.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Encoding {
    /// Token as sent by clients in `Accept-Encoding`.
    pub token: &'static str,
    /// File-name suffix of the precompressed variant (e.g. `.br`).
    pub suffix: &'static str,
    /// Value emitted in the `Content-Encoding` response header.
    pub content_encoding: &'static str,
    /// Priority rank, lower is preferred. Distinct per entry.
    pub rank: u8,
}

/// All supported codings, ordered by rank.
pub static ENCODINGS: [Encoding; 5] = [
    Encoding {
        token: "br",
        suffix: ".br",
        content_encoding: "br",
        rank: 1,
    },
    Encoding {
        token: "zstd",
        suffix: ".zst",
        content_encoding: "zstd",
        rank: 2,
    },
    Encoding {
        token: "gzip",
        suffix: ".gz",
        content_encoding: "gzip",
        rank: 3,
    },
    Encoding {
        token: "deflate",
        suffix: ".deflate",
        content_encoding: "deflate",
        rank: 4,
    },
    Encoding {
        token: "compress",
        suffix: ".Z",
        content_encoding: "compress",
        rank: 5,
    },
];

impl Encoding {
    /// Look up a descriptor by its `Accept-Encoding` token.
    ///
    /// Content-coding tokens are case-insensitive.
    pub fn from_token(token: &str) -> Option<&'static Encoding> {
        ENCODINGS
            .iter()
            .find(|e| e.token.eq_ignore_ascii_case(token))
    }

    /// Return the descriptor whose suffix the file name at `path` carries.
    ///
    /// Suffixes are matched case-sensitively (`.Z` is not `.z`).
    pub fn from_variant_path(path: &Path) -> Option<&'static Encoding> {
        let name = path.file_name()?.to_str()?;
        ENCODINGS
            .iter()
            .find(|e| name.len() > e.suffix.len() && name.ends_with(e.suffix))
    }

    /// Key of the precompressed sibling of `key`.
    pub fn variant_key(&self, key: &str) -> String {
        format!("{}{}", key, self.suffix)
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token)
    }
}
