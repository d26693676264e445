//! Configure command implementation.
//!
//! Applies field edits from the command line and saves the descriptor.

use super::helpers::{open_session, print_descriptor};
use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;
use crate::resources::FsIconStore;

/// Execute configure command
pub(super) async fn execute_configure(args: &Args, config: &RuntimeConfig) -> Result<()> {
    let Command::Configure {
        source,
        fields,
        dry_run,
    } = &args.command
    else {
        unreachable!("execute_configure called with non-Configure command");
    };

    let mut session = open_session(source, config).await?;
    fields.apply(session.edit_mut());

    if *dry_run {
        session.validate()?;
        let descriptor = session.synchronize()?;
        config.println(&format!(
            "Dry run, would write {}:",
            session.layout().descriptor_path().display()
        ));
        print_descriptor(config, &descriptor);
        if !session.is_dirty() {
            config.println("No changes");
        }
        return Ok(());
    }

    if !session.is_dirty() {
        config.println("No changes to save");
        return Ok(());
    }

    let result = session.save(&FsIconStore).await?;
    config.success_println(&result.format_result());
    if let Some(descriptor) = session.last_saved() {
        config.verbose_println(&descriptor.summary());
    }
    Ok(())
}
