//! File system utilities for the collection cache
//!
//! Cache files are written atomically so a reader (another process, or this
//! one after a crash) never sees a half-written collection. Async variants run
//! the blocking work on tokio's blocking pool.
//!
//! # Examples
//!
//! ```rust,no_run
//! use iconlens_cli::utils::fs::{atomic_write, ensure_dir};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("cache/collections"))?;
//! atomic_write(Path::new("cache/collections/mdi.json"), br#"{"prefix":"mdi","icons":{}}"#)?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::{FileOperation, FileResultExt};

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Errors
///
/// Returns an error if the path exists but is not a directory, or creation fails.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_file_context(
            FileOperation::CreateDir,
            path,
            "creating directory",
            "utils::fs::ensure_dir",
        )?;
    } else if !path.is_dir() {
        anyhow::bail!("Path exists but is not a directory: {}", path.display());
    }
    Ok(())
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// Content goes to a temporary file in the target directory, is synced, and is
/// then renamed over `path`. Parent directories are created as needed.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;

    temp.write_all(content).and_then(|()| temp.as_file().sync_all()).with_file_context(
        FileOperation::Write,
        temp.path(),
        "writing temp file",
        "utils::fs::atomic_write",
    )?;

    temp.persist(path).map_err(|err| err.error).with_file_context(
        FileOperation::Write,
        path,
        "replacing file with temp file",
        "utils::fs::atomic_write",
    )?;

    Ok(())
}

/// Async wrapper around [`atomic_write`].
pub async fn atomic_write_async(path: PathBuf, content: Vec<u8>) -> Result<()> {
    tokio::task::spawn_blocking(move || atomic_write(&path, &content))
        .await
        .context("Atomic write task panicked")?
}

/// Removes a directory tree; a missing directory is not an error.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err)
            .with_file_context(
                FileOperation::Remove,
                path,
                "removing directory",
                "utils::fs::remove_dir_all",
            )
            .map_err(Into::into),
    }
}

/// Total size in bytes of the regular files directly inside `path`.
///
/// A missing directory has size 0.
pub async fn dir_size(path: &Path) -> Result<u64> {
    let mut entries = match tokio::fs::read_dir(path).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(err) => {
            return Err(err)
                .with_file_context(FileOperation::ReadDir, path, "measuring size", "utils::fs::dir_size")
                .map_err(Into::into);
        }
    };

    let mut total = 0;
    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if metadata.is_file() {
            total += metadata.len();
        }
    }
    Ok(total)
}
