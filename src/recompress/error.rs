//! Failure taxonomy of recompression runs.
//!
//! Every variant is fatal: the walk stops at the first one and the error is
//! returned to the caller unchanged.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Hard failures that abort a recompression or cleanup run.
#[derive(Error, Debug)]
pub enum RecompressError {
    #[error("walk failed below {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("stat failed for {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{command:?} exited with {status}")]
    CommandFailed {
        command: Vec<String>,
        status: ExitStatus,
    },

    #[error("remove failed for {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid command line {0:?}")]
    InvalidCommand(String),
}
