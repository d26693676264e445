//! Descriptor persistence.
//!
//! Saves go through a temporary sibling file that is synced and then renamed
//! over the target, so a crash mid-write never leaves a truncated descriptor.

use crate::descriptor::Descriptor;
use crate::error::{DescriptorError, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Reads and writes one descriptor file
#[derive(Debug, Clone)]
pub struct DescriptorStore {
    /// Path to descriptor file
    path: PathBuf,
}

/// Result of a lenient descriptor load
#[derive(Debug)]
pub struct LoadDescriptorResult {
    /// Loaded descriptor, `None` when missing or unreadable
    pub descriptor: Option<Descriptor>,
    /// Problems that were downgraded to "no existing configuration"
    pub warnings: Vec<String>,
}

/// Result of descriptor saving operation
#[derive(Debug)]
pub struct SaveDescriptorResult {
    /// Where the descriptor was written
    pub path: PathBuf,
    /// Size of saved file in bytes
    pub file_size_bytes: u64,
    /// Duration of save operation
    pub save_duration: Duration,
}

impl DescriptorStore {
    /// Create a store for the descriptor at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Descriptor file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if descriptor file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Save descriptor to file
    pub async fn save(&self, descriptor: &Descriptor) -> Result<SaveDescriptorResult> {
        let start_time = Instant::now();

        let serialized = descriptor.to_json().map_err(|e| DescriptorError::SaveFailed {
            reason: format!("Failed to serialize descriptor: {}", e),
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DescriptorError::SaveFailed {
                    reason: format!("Failed to create {}: {}", parent.display(), e),
                })?;
        }

        // Write to temporary file first (atomic operation)
        let temp_file_path = self.path.with_extension("tmp");

        {
            let mut file =
                fs::File::create(&temp_file_path)
                    .await
                    .map_err(|e| DescriptorError::SaveFailed {
                        reason: format!("Failed to create temp file: {}", e),
                    })?;

            file.write_all(serialized.as_bytes())
                .await
                .map_err(|e| DescriptorError::SaveFailed {
                    reason: format!("Failed to write descriptor: {}", e),
                })?;

            file.sync_all().await.map_err(|e| DescriptorError::SaveFailed {
                reason: format!("Failed to sync file: {}", e),
            })?;
        }

        // Atomic rename
        if let Err(e) = fs::rename(&temp_file_path, &self.path).await {
            let _ = fs::remove_file(&temp_file_path).await;
            return Err(DescriptorError::SaveFailed {
                reason: format!("Failed to rename temp file: {}", e),
            }
            .into());
        }

        log::info!("Saved descriptor to {}", self.path.display());

        Ok(SaveDescriptorResult {
            path: self.path.clone(),
            file_size_bytes: serialized.len() as u64,
            save_duration: start_time.elapsed(),
        })
    }

    /// Load descriptor from file.
    ///
    /// A missing file is `Ok(None)`; unreadable or malformed contents are errors.
    pub async fn load(&self) -> Result<Option<Descriptor>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DescriptorError::LoadFailed {
                    reason: format!("Failed to read file {}: {}", self.path.display(), e),
                }
                .into());
            }
        };

        let descriptor = Descriptor::from_json(&contents).map_err(|e| DescriptorError::Corrupted {
            reason: format!("Failed to deserialize {}: {}", self.path.display(), e),
        })?;

        Ok(Some(descriptor))
    }

    /// Load descriptor, treating unreadable or corrupt files as absent.
    ///
    /// A broken sidecar must never block editing, so the problem is reported
    /// as a warning and the caller starts from defaults.
    pub async fn load_lenient(&self) -> LoadDescriptorResult {
        match self.load().await {
            Ok(descriptor) => LoadDescriptorResult {
                descriptor,
                warnings: Vec::new(),
            },
            Err(e) => {
                log::warn!("Ignoring existing descriptor: {}", e);
                LoadDescriptorResult {
                    descriptor: None,
                    warnings: vec![e.to_string()],
                }
            }
        }
    }

    /// Delete descriptor file if present
    pub async fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DescriptorError::SaveFailed {
                reason: format!("Failed to remove {}: {}", self.path.display(), e),
            }
            .into()),
        }
    }
}

impl SaveDescriptorResult {
    /// Format save result for display
    pub fn format_result(&self) -> String {
        format!(
            "Descriptor saved to {}: {} bytes in {:.2}s",
            self.path.display(),
            self.file_size_bytes,
            self.save_duration.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Asset;

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = DescriptorStore::new(dir.path().join("project.json"));
        assert!(store.load().await.unwrap().is_none());
        assert!(!store.exists());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DescriptorStore::new(dir.path().join("project.json"));
        let mut descriptor = Descriptor {
            name: "Demo".into(),
            package_id: "com.example.demo".into(),
            ..Default::default()
        };
        descriptor
            .assets
            .insert(Asset::new("file:///android_asset/x", "/x"));

        store.save(&descriptor).await.unwrap();
        let first = std::fs::read(store.path()).unwrap();
        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, descriptor);

        store.save(&loaded).await.unwrap();
        assert_eq!(std::fs::read(store.path()).unwrap(), first);
        assert!(!dir.path().join("project.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_lenient() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo_config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = DescriptorStore::new(&path);

        assert!(store.load().await.is_err());
        let result = store.load_lenient().await;
        assert!(result.descriptor.is_none());
        assert_eq!(result.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_version_code_loads_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo_config.json");
        std::fs::write(&path, r#"{"name": "Foo", "versionCode": 4294967295}"#).unwrap();
        let store = DescriptorStore::new(&path);

        assert!(store.load().await.is_err());
        let result = store.load_lenient().await;
        assert!(result.descriptor.is_none());
        assert!(result.warnings[0].contains("versionCode"));
    }
}
