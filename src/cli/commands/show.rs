//! Show command implementation.
//!
//! Prints the persisted descriptor of a script or project.

use super::helpers::{open_session, print_descriptor};
use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;

/// Execute show command
pub(super) async fn execute_show(args: &Args, config: &RuntimeConfig) -> Result<()> {
    let Command::Show { source, json } = &args.command else {
        unreachable!("execute_show called with non-Show command");
    };

    let session = open_session(source, config).await?;
    let Some(descriptor) = session.last_saved() else {
        if *json {
            println!("null");
        } else {
            config.println(&format!(
                "No descriptor at {}",
                session.layout().descriptor_path().display()
            ));
        }
        return Ok(());
    };

    if *json {
        print!("{}", descriptor.to_json()?);
    } else {
        config.println(&format!("📦 {}", descriptor.summary()));
        print_descriptor(config, descriptor);
    }
    Ok(())
}
