//! Tree walks for compress and cleanup runs.

use std::ffi::OsString;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::encoding::{Encoding, ENCODINGS};

use super::{default_compressors, Compressor, RecompressError};

/// Files smaller than this rarely compress to anything useful.
pub const DEFAULT_MIN_SIZE: u64 = 128;
/// Larger files are left alone to bound run time.
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

/// Settings for [`compress_tree`].
#[derive(Debug, Clone)]
pub struct CompressOptions {
    pub root: PathBuf,
    pub dry_run: bool,
    /// Originals below this size are skipped.
    pub min_size: u64,
    /// Originals above this size are skipped.
    pub max_size: u64,
    pub compressors: Vec<Compressor>,
}

impl CompressOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            compressors: default_compressors(),
        }
    }
}

/// Settings for [`cleanup_tree`].
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    pub root: PathBuf,
    pub dry_run: bool,
    /// Keep variants that are newer than their original.
    pub old_only: bool,
}

impl CleanupOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
            old_only: false,
        }
    }
}

/// Counts of what a run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Originals visited.
    pub files: usize,
    /// Originals outside the size thresholds.
    pub skipped: usize,
    /// Variants left alone because they are newer than the original.
    pub up_to_date: usize,
    /// Variants created and kept.
    pub compressed: usize,
    /// Variants deleted.
    pub removed: usize,
    /// Actions logged but not performed in dry-run mode.
    pub planned: usize,
}

/// Create precompressed variants for every eligible file below `opts.root`.
pub fn compress_tree(opts: &CompressOptions) -> Result<Summary, RecompressError> {
    let mut summary = Summary::default();

    walk_originals(&opts.root, |path, original| {
        summary.files += 1;
        let size = original.len();
        if size < opts.min_size {
            tracing::info!(path = %path.display(), size, min_size = opts.min_size, "Skip compressing, too small");
            summary.skipped += 1;
            return Ok(());
        }
        if size > opts.max_size {
            tracing::info!(path = %path.display(), size, max_size = opts.max_size, "Skip compressing, too large");
            summary.skipped += 1;
            return Ok(());
        }

        let original_mtime = modified(path, original)?;
        for compressor in &opts.compressors {
            let variant = variant_path(path, compressor.suffix);
            if let Ok(existing) = fs::metadata(&variant) {
                if modified(&variant, &existing)? > original_mtime {
                    tracing::info!(path = %path.display(), compressed = %variant.display(), "Skip compressing, up-to-date");
                    summary.up_to_date += 1;
                    continue;
                }
            }

            if opts.dry_run {
                tracing::info!(path = %path.display(), cmd = ?compressor.command_for(path), "Dry-run: would compress file");
                summary.planned += 1;
                continue;
            }

            compressor.run(path)?;
            let created = fs::metadata(&variant).map_err(|source| RecompressError::Stat {
                path: variant.clone(),
                source,
            })?;
            if created.len() >= size {
                tracing::info!(
                    path = %path.display(),
                    compressed = %variant.display(),
                    original_size = size,
                    compressed_size = created.len(),
                    "Compressed file is not smaller than original, removing"
                );
                remove(&variant)?;
                summary.removed += 1;
            } else {
                tracing::info!(
                    path = %path.display(),
                    compressed = %variant.display(),
                    original_size = size,
                    compressed_size = created.len(),
                    "Compressed file created"
                );
                summary.compressed += 1;
            }
        }
        Ok(())
    })?;

    Ok(summary)
}

/// Remove precompressed variants below `opts.root`.
///
/// Every servable suffix is considered, not only the ones this tool produces.
pub fn cleanup_tree(opts: &CleanupOptions) -> Result<Summary, RecompressError> {
    let mut summary = Summary::default();

    walk_originals(&opts.root, |path, original| {
        summary.files += 1;
        let original_mtime = modified(path, original)?;

        for encoding in ENCODINGS.iter() {
            let variant = variant_path(path, encoding.suffix);
            let Ok(existing) = fs::metadata(&variant) else {
                continue;
            };
            if opts.old_only && modified(&variant, &existing)? > original_mtime {
                tracing::info!(path = %path.display(), compressed = %variant.display(), "Skip cleanup, up-to-date");
                summary.up_to_date += 1;
                continue;
            }

            if opts.dry_run {
                tracing::info!(path = %path.display(), compressed = %variant.display(), "Dry-run: would remove compressed file");
                summary.planned += 1;
                continue;
            }
            remove(&variant)?;
            tracing::info!(path = %path.display(), compressed = %variant.display(), "Removed compressed file");
            summary.removed += 1;
        }
        Ok(())
    })?;

    Ok(summary)
}

/// Visit every non-directory entry that is not itself a variant, in file-name order.
fn walk_originals<F>(root: &Path, mut visit: F) -> Result<(), RecompressError>
where
    F: FnMut(&Path, &Metadata) -> Result<(), RecompressError>,
{
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| RecompressError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        if Encoding::from_variant_path(path).is_some() {
            continue;
        }
        let metadata = fs::metadata(path).map_err(|source| RecompressError::Stat {
            path: path.to_path_buf(),
            source,
        })?;
        visit(path, &metadata)?;
    }
    Ok(())
}

fn variant_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn modified(path: &Path, metadata: &Metadata) -> Result<SystemTime, RecompressError> {
    metadata.modified().map_err(|source| RecompressError::Stat {
        path: path.to_path_buf(),
        source,
    })
}

fn remove(path: &Path) -> Result<(), RecompressError> {
    fs::remove_file(path).map_err(|source| {
        tracing::error!(path = %path.display(), error = %source, "Remove compressed file failed");
        RecompressError::Remove {
            path: path.to_path_buf(),
            source,
        }
    })
}
