//! Status command implementation.
//!
//! Reports mode, descriptor location, input problems and unsaved state.

use super::helpers::open_session;
use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;
use crate::session::check_inputs;

/// Execute status command
pub(super) async fn execute_status(args: &Args, config: &RuntimeConfig) -> Result<()> {
    let Command::Status { source } = &args.command else {
        unreachable!("execute_status called with non-Status command");
    };

    let session = open_session(source, config).await?;
    let layout = session.layout();
    let out = config.output();

    let _ = out.section("Status");
    let _ = out.field("Mode", &layout.mode().to_string());
    let _ = out.field("Descriptor", &layout.descriptor_path().display().to_string());
    let _ = out.field("Resources", &layout.resource_dir().display().to_string());
    let _ = out.field(
        "Saved",
        if session.last_saved().is_some() { "yes" } else { "no" },
    );
    let _ = out.field(
        "Unsaved changes",
        if session.is_dirty() { "yes" } else { "no" },
    );

    let enabled = session.edit().capabilities.enabled();
    let enabled = if enabled.is_empty() {
        "-".to_string()
    } else {
        enabled
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let _ = out.field("Capabilities", &enabled);

    let problems = check_inputs(session.edit());
    if problems.is_empty() {
        config.success_println("All required fields are valid");
    } else {
        for problem in &problems {
            config.warning_println(&problem.to_string());
        }
    }
    Ok(())
}
