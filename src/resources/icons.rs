//! Copying icon images into a project's resource directory.

use crate::bundles::catalog::icons;
use crate::error::{CliError, Result};
use crate::project::ProjectLayout;
use crate::session::EditState;
use crate::utils::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Places an icon image inside a project.
///
/// Implementations may decode, scale or simply copy; the returned path is
/// where the stored file ended up.
pub trait IconStore {
    /// Store the image named by `reference` at `destination`.
    ///
    /// `reference` is a `file:` URI, an absolute path, or a path relative to
    /// `base_dir`.
    fn store(
        &self,
        reference: &str,
        base_dir: &Path,
        destination: &Path,
    ) -> impl Future<Output = Result<PathBuf>> + Send;
}

/// Byte-for-byte copy into the resource directory
#[derive(Debug, Clone, Copy, Default)]
pub struct FsIconStore;

impl IconStore for FsIconStore {
    async fn store(&self, reference: &str, base_dir: &Path, destination: &Path) -> Result<PathBuf> {
        let source = reference_to_path(reference, base_dir)?;
        if source == destination {
            return Ok(destination.to_path_buf());
        }
        fs::copy_file(&source, destination).await?;
        log::debug!("Stored icon {} at {}", source.display(), destination.display());
        Ok(destination.to_path_buf())
    }
}

/// Local file behind an icon reference
pub fn reference_to_path(reference: &str, base_dir: &Path) -> Result<PathBuf> {
    if let Ok(url) = Url::parse(reference) {
        if url.scheme() != "file" {
            return Err(CliError::InvalidArguments {
                reason: format!("Icon '{}' is not a local file", reference),
            }
            .into());
        }
        return url.to_file_path().map_err(|_| {
            CliError::InvalidArguments {
                reason: format!("Icon '{}' is not a valid file URI", reference),
            }
            .into()
        });
    }

    let path = Path::new(reference);
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(base_dir.join(path))
    }
}

/// `file:` URI for a stored icon
pub fn file_uri(path: &Path) -> String {
    Url::from_file_path(path)
        .map(String::from)
        .unwrap_or_else(|_| path.to_string_lossy().into_owned())
}

/// Copy both icons of `edit` into the layout's resource directory.
///
/// Returns a new edit-state whose icon fields point at the stored copies;
/// `edit` itself is left alone so a later failure loses nothing.
pub async fn stage_icons<S: IconStore>(
    store: &S,
    layout: &ProjectLayout,
    edit: &EditState,
) -> Result<EditState> {
    let mut staged = edit.clone();
    let base = layout.directory();

    if let Some(reference) = &edit.icon {
        let destination = base.join(layout.icon_relative_path(icons::LAUNCHER));
        let stored = store.store(reference, base, &destination).await?;
        staged.icon = Some(file_uri(&stored));
    }
    if let Some(reference) = &edit.splash_icon {
        let destination = base.join(layout.icon_relative_path(icons::SPLASH));
        let stored = store.store(reference, base, &destination).await?;
        staged.splash_icon = Some(file_uri(&stored));
    }

    Ok(staged)
}
