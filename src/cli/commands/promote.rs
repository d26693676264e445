//! Promote command implementation.

use super::helpers::open_session;
use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;
use crate::resources::FsIconStore;

/// Execute promote command
pub(super) async fn execute_promote(args: &Args, config: &RuntimeConfig) -> Result<()> {
    let Command::Promote { source } = &args.command else {
        unreachable!("execute_promote called with non-Promote command");
    };

    let mut session = open_session(source, config).await?;
    let _ = config
        .output()
        .progress(&format!("Promoting {}", session.layout().source().display()));

    let promotion = session.promote(&FsIconStore).await?;
    for warning in &promotion.warnings {
        config.warning_println(warning);
    }
    config.println(&promotion.format_result());
    Ok(())
}
