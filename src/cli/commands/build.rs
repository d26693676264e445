//! Build command implementation.
//!
//! Runs the session through its actor: forced save, then the packager, then
//! waits for the terminal state and acknowledges it.

use super::helpers::open_session;
use crate::build::{BuildState, ProcessPackager};
use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::{PackagingError, Result};
use crate::resources::FsIconStore;
use crate::session::SessionHandle;
use std::time::Duration;

/// Execute build command, returning the exit code
pub(super) async fn execute_build(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let Command::Build {
        source,
        packager,
        timeout,
    } = &args.command
    else {
        unreachable!("execute_build called with non-Build command");
    };

    let session = open_session(source, config).await?;
    let seconds = timeout.unwrap_or(session.settings().packager_timeout_secs);
    let packager = ProcessPackager::new(packager.clone(), Duration::from_secs(seconds));
    config.verbose_println(&format!(
        "Packager: {} (timeout {}s)",
        packager.command(),
        seconds
    ));

    let handle = SessionHandle::spawn(session, FsIconStore, packager);
    handle.build().await?;
    let _ = config.output().progress("Packaging...");

    let exit_code = match handle.wait_for_build().await? {
        BuildState::Succeeded(report) => {
            config.success_println("Build succeeded");
            config.println(&report.format_result());
            0
        }
        BuildState::Failed { message } => {
            config.error_println(&format!("Build failed: {}", message));
            1
        }
        other => {
            return Err(PackagingError::Failed {
                reason: format!("build ended in unexpected state: {}", other),
            }
            .into());
        }
    };

    handle.acknowledge().await?;
    handle.close().await?;
    Ok(exit_code)
}
