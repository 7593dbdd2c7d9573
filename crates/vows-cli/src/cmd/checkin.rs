use crate::output::{CliError, OutputMode, render_error, render_item};
use anyhow::Result;
use clap::Args;
use std::path::Path;
use tracing::info;
use vows_core::error::ErrorCode;
use vows_core::{GuestId, Outcome};

#[derive(Args, Debug)]
pub struct CheckinArgs {
    /// Id of the guest whose arrival to toggle.
    pub id: GuestId,
}

/// Execute `vows checkin`: flip the guest's checked-in flag and show the
/// guest afterwards.
///
/// # Errors
///
/// Returns an error if no guest has the id or the backend rejects the
/// update (the flag is restored).
pub fn run_checkin(args: &CheckinArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let (mut store, _) = super::open_store(project_root, output)?;
    match store.toggle_check_in(args.id) {
        Outcome::Applied(checked_in) => {
            info!(id = args.id, checked_in, "toggled check-in");
            if let Some(guest) = store.get(args.id) {
                render_item(guest, output)?;
            }
        }
        Outcome::Skipped => {
            let message = format!("guest {} not found", args.id);
            render_error(output, &CliError::coded(&message, ErrorCode::GuestNotFound))?;
            anyhow::bail!(message);
        }
        Outcome::Failed => {}
    }
    super::finish(&store, output)
}
