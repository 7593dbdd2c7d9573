use crate::output::{CliError, OutputMode, render_error, render_mode, render_success, write_list};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use vows_core::import::import_path;
use vows_core::{Guest, Outcome};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV file or Excel workbook (.xlsx, .xls) with a header row, then name,
    /// table, VIP columns. Only the first sheet of a workbook is read.
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct ImportReport {
    imported: usize,
    guests: Vec<Guest>,
}

/// Execute `vows import`: add every data row of a guest spreadsheet in one
/// batch.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the backend
/// rejects the batch (nothing is added).
pub fn run_import(args: &ImportArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let drafts = match import_path(&args.file) {
        Ok(drafts) => drafts,
        Err(err) => {
            render_error(output, &CliError::coded(err.to_string(), err.code()))?;
            anyhow::bail!(err);
        }
    };

    let (mut store, _) = super::open_store(project_root, output)?;
    match store.add_guests(drafts) {
        Outcome::Applied(guests) => {
            info!(count = guests.len(), file = %args.file.display(), "imported guests");
            let report = ImportReport {
                imported: guests.len(),
                guests,
            };
            render_mode(
                output,
                &report,
                |r, w| {
                    let rows: Vec<&Guest> = r.guests.iter().collect();
                    write_list(&rows, OutputMode::Text, w)
                },
                |r, w| writeln!(w, "✓ Imported {} guests", r.imported),
            )?;
        }
        Outcome::Skipped => render_success(output, "No guests found in file")?,
        Outcome::Failed => {}
    }
    super::finish(&store, output)
}
