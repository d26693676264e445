//! The packaging collaborator: turns a persisted descriptor into an artifact.

use crate::descriptor::Descriptor;
use crate::error::PackagingError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Everything a packager gets to work with
#[derive(Debug, Clone)]
pub struct PackageRequest {
    /// Descriptor exactly as just written
    pub descriptor: Descriptor,
    /// Where it was written
    pub descriptor_path: PathBuf,
    /// Project (or loose script) directory
    pub project_dir: PathBuf,
}

/// Produces an installable artifact from a saved descriptor.
///
/// Returns the artifact path or the collaborator's failure reason.
pub trait Packager {
    /// Package `request`
    fn package(
        &self,
        request: &PackageRequest,
    ) -> impl Future<Output = Result<PathBuf, PackagingError>> + Send;
}

/// Runs `<command> <descriptor-file> <project-dir>` and reads the artifact
/// path from the last non-empty line of its stdout.
#[derive(Debug, Clone)]
pub struct ProcessPackager {
    command: String,
    timeout: Duration,
}

impl ProcessPackager {
    /// Packager running `command` with the given time limit
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    /// Command as configured
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Packager for ProcessPackager {
    async fn package(&self, request: &PackageRequest) -> Result<PathBuf, PackagingError> {
        let program = which::which(&self.command).map_err(|e| PackagingError::ToolNotFound {
            command: self.command.clone(),
            reason: e.to_string(),
        })?;

        log::info!(
            "Running packager {} for {}",
            program.display(),
            request.descriptor_path.display()
        );

        let output = Command::new(&program)
            .arg(&request.descriptor_path)
            .arg(&request.project_dir)
            .current_dir(&request.project_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match timeout(self.timeout, output).await {
            Err(_) => {
                return Err(PackagingError::TimedOut {
                    seconds: self.timeout.as_secs(),
                });
            }
            Ok(Err(e)) => {
                return Err(PackagingError::Failed {
                    reason: format!("Failed to run {}: {}", program.display(), e),
                });
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = last_line(&stderr).unwrap_or("no error output");
            return Err(PackagingError::Failed {
                reason: format!(
                    "{} exited with code {}: {}",
                    self.command,
                    output.status.code().unwrap_or(-1),
                    message
                ),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let Some(reported) = last_line(&stdout) else {
            return Err(PackagingError::Failed {
                reason: format!("{} did not report an artifact path", self.command),
            });
        };

        let artifact = resolve_artifact(reported, &request.project_dir);
        if !artifact.exists() {
            return Err(PackagingError::MissingArtifact { path: artifact });
        }
        Ok(artifact)
    }
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).rev().find(|line| !line.is_empty())
}

fn resolve_artifact(reported: &str, project_dir: &Path) -> PathBuf {
    let path = Path::new(reported);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    }
}
