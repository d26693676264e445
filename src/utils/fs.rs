//! File system helpers for saving and promoting projects.
//!
//! Provides idempotent removal, parent-creating copies and recursive
//! directory copies with path-carrying errors.

use crate::error::{ErrorExt, FilesystemError, Result};
use std::io;
use std::path::Path;
use tokio::fs;

/// Creates exactly one directory; fails if it already exists.
pub async fn create_dir(path: &Path) -> Result<()> {
    match fs::create_dir(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(FilesystemError::AlreadyExists {
            path: path.to_path_buf(),
        }
        .into()),
        Err(e) => Err(e).fs_context("creating directory", path),
    }
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Removes a file if it exists.
pub async fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("removing file", path),
    }
}

/// Renames `from` to `to`.
pub async fn move_path(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).await.fs_context("moving", from)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.is_file() {
        return Err(FilesystemError::NotAFile {
            path: from.to_path_buf(),
        }
        .into());
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)?;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Symlinks are copied as the files they point to.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(FilesystemError::Fs {
            context: "copying directory",
            path: from.to_path_buf(),
            error: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        }
        .into());
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }

    for entry in walkdir::WalkDir::new(from).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(from).to_path_buf();
            FilesystemError::Fs {
                context: "walking directory",
                path,
                error: e.into(),
            }
        })?;
        let Ok(rel_path) = entry.path().strip_prefix(from) else {
            continue;
        };
        let dest_path = to.join(rel_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .await
                .fs_context("creating directory", &dest_path)?;
        } else {
            fs::copy(entry.path(), &dest_path)
                .await
                .fs_context("copying file", entry.path())?;
        }
    }

    Ok(())
}
