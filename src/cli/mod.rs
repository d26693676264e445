//! Command line interface for script_build_config.
//!
//! Parses arguments, opens a session on the given script or project and
//! reports results through colored terminal output.

mod args;
pub mod commands;
mod output;

pub use args::{Args, CapabilityArg, Command, FieldArgs, RuntimeConfig};
pub use commands::execute_command;
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute_command(args).await
}
