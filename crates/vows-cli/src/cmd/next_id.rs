use crate::output::{CliError, OutputMode, render_error, render_mode};
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use vows_core::GuestId;
use vows_core::error::ErrorCode;

#[derive(Debug, Serialize)]
struct NextId {
    next_id: GuestId,
}

/// Execute `vows next-id`: the id a guest added now would receive under the
/// local max+1 policy.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or loaded, or the largest
/// id leaves no successor.
pub fn run_next_id(output: OutputMode, project_root: &Path) -> Result<()> {
    let (store, _) = super::open_store(project_root, output)?;
    let Some(next_id) = store.next_id() else {
        render_error(
            output,
            &CliError::coded("no guest ids left", ErrorCode::IdSpaceExhausted),
        )?;
        anyhow::bail!("no guest ids left");
    };
    let value = NextId { next_id };
    render_mode(
        output,
        &value,
        |v, w| writeln!(w, "{}", v.next_id),
        |v, w| writeln!(w, "Next guest id: {}", v.next_id),
    )?;
    super::finish(&store, output)
}
