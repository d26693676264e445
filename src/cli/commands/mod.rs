//! Command execution functions.
//!
//! Each subcommand opens a session on its source, does its one job and
//! reports through the runtime config's output manager.

mod build;
mod configure;
mod helpers;
mod promote;
mod show;
mod status;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;

use build::execute_build;
use configure::execute_configure;
use helpers::print_suggestions;
use promote::execute_promote;
use show::execute_show;
use status::execute_status;

/// Execute the main command based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        let output = super::OutputManager::new(false, false);
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(2);
    }

    let config = RuntimeConfig::from(&args);

    let result = match &args.command {
        Command::Build { .. } => execute_build(&args, &config).await,
        Command::Show { .. } => execute_show(&args, &config).await.map(|()| 0),
        Command::Status { .. } => execute_status(&args, &config).await.map(|()| 0),
        Command::Configure { .. } => execute_configure(&args, &config).await.map(|()| 0),
        Command::Promote { .. } => execute_promote(&args, &config).await.map(|()| 0),
    };

    match result {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            config.error_println(&format!(
                "Command '{}' failed: {}",
                args.command.name(),
                e
            ));
            if config.is_verbose() || !e.is_recoverable() {
                print_suggestions(&config, &e.recovery_suggestions());
            }
            Ok(1)
        }
    }
}
