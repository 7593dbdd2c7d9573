use crate::output::{CliError, OutputMode, render_error, render_item};
use anyhow::Result;
use clap::Args;
use std::path::Path;
use tracing::info;
use vows_core::GuestDraft;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Guest name as it should appear on the list.
    #[arg(long, short)]
    pub name: String,

    /// Table assignment; blank means "Unassigned".
    #[arg(long, short, default_value = "")]
    pub table: String,

    /// Mark the guest as a VIP.
    #[arg(long)]
    pub vip: bool,
}

/// Execute `vows add`.
///
/// # Errors
///
/// Returns an error if the name is blank or the backend rejects the guest.
pub fn run_add(args: &AddArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let draft = match GuestDraft::new(&args.name, &args.table, args.vip) {
        Ok(draft) => draft,
        Err(err) => {
            render_error(output, &CliError::coded(err.to_string(), err.code()))?;
            anyhow::bail!(err);
        }
    };

    let (mut store, _) = super::open_store(project_root, output)?;
    if let Some(guest) = store.add_guest(draft).applied() {
        info!(id = guest.id, "added guest");
        render_item(&guest, output)?;
    }
    super::finish(&store, output)
}
