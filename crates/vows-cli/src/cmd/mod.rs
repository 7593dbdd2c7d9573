pub mod add;
pub mod checkin;
pub mod completions;
pub mod import;
pub mod init;
pub mod list;
pub mod next_id;
pub mod remove;
pub mod stats;

use crate::output::{CliError, OutputMode, render_error};
use anyhow::{Context as _, Result};
use std::path::Path;
use vows_core::config::{self, ProjectConfig};
use vows_core::error::ErrorCode;
use vows_core::{Backend, GuestStore};

pub type Store = GuestStore<Box<dyn Backend>>;

/// Open and load the store configured for `project_root`.
///
/// # Errors
///
/// Returns an error if the project has not been initialized, the config is
/// malformed, or the backend cannot be opened.
pub fn open_store(project_root: &Path, output: OutputMode) -> Result<(Store, ProjectConfig)> {
    if !config::config_path(project_root).exists() {
        render_error(
            output,
            &CliError::coded("no guest registry in this directory", ErrorCode::NotInitialized),
        )?;
        anyhow::bail!("not a vows project: {}", project_root.display());
    }

    let project = match config::load_project_config(project_root) {
        Ok(project) => project,
        Err(err) => {
            render_error(
                output,
                &CliError::coded(format!("{err:#}"), ErrorCode::ConfigParseError),
            )?;
            return Err(err);
        }
    };
    let backend = config::open_backend(project_root, &project)
        .with_context(|| format!("Failed to open {:?} backend", project.storage.backend))?;
    let store = GuestStore::open(backend);
    Ok((store, project))
}

/// Fail the command if the store's error slot is set.
///
/// # Errors
///
/// Returns the store's error message.
pub fn finish(store: &Store, output: OutputMode) -> Result<()> {
    match store.error() {
        Some(message) => {
            render_error(output, &CliError::new(message))?;
            anyhow::bail!("{message}");
        }
        None => Ok(()),
    }
}
