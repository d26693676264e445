//! Observable build lifecycle around the packaging collaborator.
//!
//! `Idle -> Building -> {Succeeded, Failed} -> Idle`. The dispatcher never
//! packages anything itself; it tracks state and turns a packager result
//! into a [`BuildReport`].

use super::packager::{PackageRequest, Packager};
use crate::error::PackagingError;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncReadExt;

/// Information about a produced artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Artifact path reported by the packager
    pub artifact: PathBuf,
    /// Size of the artifact in bytes
    pub size: u64,
    /// SHA-256 checksum of the artifact, hex encoded
    pub checksum: String,
    /// When packaging started
    pub started_at: DateTime<Utc>,
    /// When packaging finished
    pub finished_at: DateTime<Utc>,
}

impl BuildReport {
    /// Wall time spent packaging
    pub fn elapsed(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }

    /// Format build report for display
    pub fn format_result(&self) -> String {
        format!(
            "Artifact: {}\n  size: {} bytes\n  sha256: {}\n  duration: {:.2}s\n",
            self.artifact.display(),
            self.size,
            self.checksum,
            self.elapsed().as_secs_f64()
        )
    }
}

/// Where the build lifecycle currently stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BuildState {
    /// Nothing running, nothing to report
    #[default]
    Idle,
    /// Packager running
    Building {
        /// When the build was requested
        started_at: DateTime<Utc>,
    },
    /// Packager produced an artifact
    Succeeded(BuildReport),
    /// Packager or report failed
    Failed {
        /// Message shown to the user
        message: String,
    },
}

impl BuildState {
    /// Whether a build is in progress
    pub fn is_building(&self) -> bool {
        matches!(self, BuildState::Building { .. })
    }

    /// Whether the state is waiting for acknowledgment
    pub fn is_terminal(&self) -> bool {
        matches!(self, BuildState::Succeeded(_) | BuildState::Failed { .. })
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildState::Idle => write!(f, "idle"),
            BuildState::Building { started_at } => write!(f, "building since {}", started_at),
            BuildState::Succeeded(report) => write!(f, "succeeded: {}", report.artifact.display()),
            BuildState::Failed { message } => write!(f, "failed: {}", message),
        }
    }
}

/// Build lifecycle state machine
#[derive(Debug, Default)]
pub struct BuildDispatcher {
    state: BuildState,
}

impl BuildDispatcher {
    /// Dispatcher in the idle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> &BuildState {
        &self.state
    }

    /// Enter `Building`.
    ///
    /// Returns `None` when a build is already running; the request is a
    /// no-op. An unacknowledged result is acknowledged implicitly.
    pub fn begin(&mut self) -> Option<DateTime<Utc>> {
        if self.state.is_building() {
            log::debug!("Build already in progress, ignoring request");
            return None;
        }
        let started_at = Utc::now();
        self.state = BuildState::Building { started_at };
        Some(started_at)
    }

    /// Leave `Building` with the packager's outcome.
    ///
    /// Ignored unless a build is running.
    pub fn finish(&mut self, outcome: Result<BuildReport, PackagingError>) {
        if !self.state.is_building() {
            log::warn!("Build result arrived while {}, ignoring", self.state);
            return;
        }
        self.state = match outcome {
            Ok(report) => {
                log::info!("Build succeeded: {}", report.artifact.display());
                BuildState::Succeeded(report)
            }
            Err(e) => {
                log::warn!("Build failed: {}", e);
                BuildState::Failed {
                    message: e.to_string(),
                }
            }
        };
    }

    /// Abort a build that never reached the packager (descriptor save failed)
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.state.is_building() {
            self.state = BuildState::Failed {
                message: message.into(),
            };
        }
    }

    /// Return a terminal state to `Idle`; returns whether anything changed
    pub fn acknowledge(&mut self) -> bool {
        if self.state.is_terminal() {
            self.state = BuildState::Idle;
            true
        } else {
            false
        }
    }
}

/// Run the packager and describe what it produced
pub async fn run_packager<P: Packager>(
    packager: &P,
    request: &PackageRequest,
    started_at: DateTime<Utc>,
) -> Result<BuildReport, PackagingError> {
    let artifact = packager.package(request).await?;
    let (size, checksum) = checksum_artifact(&artifact).await?;
    Ok(BuildReport {
        artifact,
        size,
        checksum,
        started_at,
        finished_at: Utc::now(),
    })
}

/// Size and SHA-256 of a file
async fn checksum_artifact(path: &Path) -> Result<(u64, String), PackagingError> {
    let missing = || PackagingError::MissingArtifact {
        path: path.to_path_buf(),
    };

    let metadata = tokio::fs::metadata(path).await.map_err(|_| missing())?;
    if !metadata.is_file() {
        return Err(missing());
    }

    let mut file = tokio::fs::File::open(path).await.map_err(|_| missing())?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];
    loop {
        let n = file.read(&mut buffer).await.map_err(|e| PackagingError::Failed {
            reason: format!("Failed to read {}: {}", path.display(), e),
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok((metadata.len(), hex::encode(hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Descriptor;

    struct FixedPackager(Result<PathBuf, PackagingError>);

    impl Packager for FixedPackager {
        async fn package(&self, _request: &PackageRequest) -> Result<PathBuf, PackagingError> {
            self.0.clone()
        }
    }

    fn request(dir: &Path) -> PackageRequest {
        PackageRequest {
            descriptor: Descriptor::default(),
            descriptor_path: dir.join("project.json"),
            project_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_second_request_while_building_is_noop() {
        let mut dispatcher = BuildDispatcher::new();
        let started = dispatcher.begin();
        assert!(started.is_some());
        assert!(dispatcher.begin().is_none());
        assert_eq!(
            dispatcher.state(),
            &BuildState::Building {
                started_at: started.unwrap()
            }
        );
    }

    #[test]
    fn test_failure_then_acknowledge_returns_to_idle() {
        let mut dispatcher = BuildDispatcher::new();
        assert!(!dispatcher.acknowledge());
        dispatcher.begin();
        dispatcher.finish(Err(PackagingError::Failed {
            reason: "boom".into(),
        }));
        assert!(matches!(dispatcher.state(), BuildState::Failed { message } if message.contains("boom")));
        assert!(dispatcher.acknowledge());
        assert_eq!(dispatcher.state(), &BuildState::Idle);
    }

    #[test]
    fn test_result_without_build_is_ignored() {
        let mut dispatcher = BuildDispatcher::new();
        dispatcher.finish(Err(PackagingError::Failed { reason: "x".into() }));
        assert_eq!(dispatcher.state(), &BuildState::Idle);
    }

    #[tokio::test]
    async fn test_report_checksums_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("app.apk");
        std::fs::write(&artifact, b"abc").unwrap();

        let packager = FixedPackager(Ok(artifact.clone()));
        let report = run_packager(&packager, &request(dir.path()), Utc::now())
            .await
            .unwrap();
        assert_eq!(report.size, 3);
        assert_eq!(
            report.checksum,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_missing_artifact_reported() {
        let dir = tempfile::tempdir().unwrap();
        let packager = FixedPackager(Ok(dir.path().join("gone.apk")));
        let err = run_packager(&packager, &request(dir.path()), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, PackagingError::MissingArtifact { .. }));
    }
}
