//! `vows stats`: arrival counts for the door.

use crate::output::{OutputMode, pretty_kv, pretty_rule, render_mode};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Execute `vows stats`.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or its load failed.
pub fn run_stats(output: OutputMode, project_root: &Path) -> Result<()> {
    let (store, _) = super::open_store(project_root, output)?;
    let stats = store.stats();

    render_mode(
        output,
        &stats,
        |s, w| {
            writeln!(
                w,
                "total\tchecked_in\tawaited\tvip\n{}\t{}\t{}\t{}",
                s.total, s.checked_in, s.awaited, s.vip
            )
        },
        |s, w| {
            writeln!(w, "Guest arrivals")?;
            pretty_rule(w)?;
            pretty_kv(w, "total", s.total.to_string())?;
            pretty_kv(w, "checked in", s.checked_in.to_string())?;
            pretty_kv(w, "awaited", s.awaited.to_string())?;
            pretty_kv(w, "vip", s.vip.to_string())
        },
    )?;
    super::finish(&store, output)
}
