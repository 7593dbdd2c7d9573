use crate::output::{OutputMode, pretty_kv, render_mode};
use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use vows_core::config::{self, BackendChoice, ProjectConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Local,
    Sqlite,
    Remote,
}

impl From<BackendArg> for BackendChoice {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Local => Self::Local,
            BackendArg::Sqlite => Self::Sqlite,
            BackendArg::Remote => Self::Remote,
        }
    }
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where the guest list is kept.
    #[arg(long, value_enum, default_value = "local")]
    pub backend: BackendArg,

    /// Start with no guests instead of the sample list (local backend).
    #[arg(long)]
    pub empty: bool,

    /// Base URL of the remote table API (remote backend).
    #[arg(long)]
    pub url: Option<String>,

    /// Overwrite an existing `.vows/config.toml`.
    #[arg(long)]
    pub force: bool,
}

const fn backend_name(choice: BackendChoice) -> &'static str {
    match choice {
        BackendChoice::Local => "local",
        BackendChoice::Sqlite => "sqlite",
        BackendChoice::Remote => "remote",
    }
}

#[derive(Debug, Serialize)]
struct InitReport {
    ok: bool,
    config: String,
    backend: BackendChoice,
    guests: usize,
}

/// Execute `vows init`: write `.vows/config.toml` and open the new registry
/// once to check the backend.
///
/// # Errors
///
/// Returns an error if a config exists and `--force` is not set, the remote
/// backend has no URL, or the backend cannot be opened.
pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let path = config::config_path(project_root);
    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists. Use `vows init --force` to reinitialize.",
            path.display()
        );
    }

    let mut project = ProjectConfig::default();
    project.storage.backend = args.backend.into();
    project.storage.seed = !args.empty;
    project.remote.url.clone_from(&args.url);
    if matches!(args.backend, BackendArg::Remote) && args.url.is_none() {
        anyhow::bail!("--backend remote requires --url");
    }

    let path = config::write_project_config(project_root, &project)?;
    let (store, _) = super::open_store(project_root, output)?;

    let report = InitReport {
        ok: true,
        config: path.display().to_string(),
        backend: project.storage.backend,
        guests: store.guests().len(),
    };

    render_mode(
        output,
        &report,
        |r, w| writeln!(w, "{}\t{}\t{}", r.config, backend_name(r.backend), r.guests),
        |r, w| {
            writeln!(w, "✓ Guest registry initialized")?;
            pretty_kv(w, "config", &r.config)?;
            pretty_kv(w, "backend", backend_name(r.backend))?;
            pretty_kv(w, "guests", r.guests.to_string())
        },
    )?;
    super::finish(&store, output)
}
