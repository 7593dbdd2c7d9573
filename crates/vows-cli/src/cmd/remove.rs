use crate::output::{CliError, OutputMode, render_error, render_success};
use anyhow::Result;
use clap::Args;
use std::path::Path;
use vows_core::error::ErrorCode;
use vows_core::{GuestId, Outcome};

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Id of the guest to remove.
    pub id: GuestId,
}

/// Execute `vows remove`.
///
/// # Errors
///
/// Returns an error if no guest has the id or the backend rejects the
/// removal (the list is left unchanged).
pub fn run_remove(args: &RemoveArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let (mut store, _) = super::open_store(project_root, output)?;
    match store.remove_guest(args.id) {
        Outcome::Applied(guest) => {
            render_success(output, &format!("Removed {} (#{})", guest.name, guest.id))?;
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
