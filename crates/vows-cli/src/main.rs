#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "vows: wedding guest registry and door check-in",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides --json and FORMAT).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Setup",
        about = "Create a guest registry",
        long_about = "Create a guest registry in the current directory by writing .vows/config.toml.",
        after_help = "EXAMPLES:\n    # Local registry seeded with sample guests\n    vows init\n\n    # Start empty\n    vows init --empty\n\n    # Use a SQLite guest table\n    vows init --backend sqlite\n\n    # Use a hosted table API\n    vows init --backend remote --url https://example.supabase.co"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Guests",
        about = "Add a guest",
        long_about = "Add one guest. New guests start not checked in.",
        after_help = "EXAMPLES:\n    # Add a guest at table 5\n    vows add --name \"Zara Ahmed\" --table 5\n\n    # Add a VIP without a table yet\n    vows add --name \"Amir Khan\" --vip\n\n    # Emit machine-readable output\n    vows add --name \"Zara Ahmed\" --json"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Guests",
        about = "Remove a guest",
        long_about = "Remove a guest by id. Other guests keep their ids.",
        after_help = "EXAMPLES:\n    # Remove guest 3\n    vows remove 3"
    )]
    Remove(cmd::remove::RemoveArgs),

    #[command(
        next_help_heading = "Guests",
        about = "Toggle a guest's check-in",
        long_about = "Mark a guest as arrived, or undo an arrival that was recorded by mistake.",
        after_help = "EXAMPLES:\n    # Check in guest 2\n    vows checkin 2\n\n    # Run again to undo\n    vows checkin 2"
    )]
    Checkin(cmd::checkin::CheckinArgs),

    #[command(
        next_help_heading = "Guests",
        about = "Import guests from a spreadsheet",
        long_about = "Import guests from a CSV file or the first sheet of an Excel workbook (.xlsx, .xls). The first row is a header; columns are name, table, VIP.",
        after_help = "EXAMPLES:\n    # Import a CSV export\n    vows import guests.csv\n\n    # Import the first sheet of a workbook\n    vows import guests.xlsx\n\n    # Emit machine-readable output\n    vows import guests.csv --json"
    )]
    Import(cmd::import::ImportArgs),

    #[command(
        next_help_heading = "Read",
        about = "List guests",
        long_about = "List guests ten per page, optionally filtered by name.",
        after_help = "EXAMPLES:\n    # First page\n    vows list\n\n    # Search by name\n    vows list --search sarah\n\n    # Third page\n    vows list --page 3\n\n    # Everyone\n    vows list --all --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show arrival counts",
        long_about = "Show total, checked-in, awaited, and VIP counts.",
        after_help = "EXAMPLES:\n    # Counts for the door\n    vows stats\n\n    # Emit machine-readable output\n    vows stats --json"
    )]
    Stats,

    #[command(
        next_help_heading = "Read",
        about = "Show the next guest id",
        long_about = "Show the id the next added guest would receive (largest id plus one).",
        after_help = "EXAMPLES:\n    vows next-id"
    )]
    NextId,

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    vows completions bash\n\n    # Generate zsh completions\n    vows completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("VOWS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if quiet {
            "error"
        } else if verbose || env::var("DEBUG").is_ok() {
            "vows=debug,info"
        } else {
            "vows=info,warn"
        })
    });

    let format = env::var("VOWS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let user = vows_core::config::load_user_config()?;
    let output = output::resolve_output_mode(cli.format, cli.json, user.output.as_deref());
    let project_root = env::current_dir()?;
    debug!(?output, root = %project_root.display(), "starting");

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, output, &project_root),
        Commands::Add(ref args) => cmd::add::run_add(args, output, &project_root),
        Commands::Remove(ref args) => cmd::remove::run_remove(args, output, &project_root),
        Commands::Checkin(ref args) => cmd::checkin::run_checkin(args, output, &project_root),
        Commands::Import(ref args) => cmd::import::run_import(args, output, &project_root),
        Commands::List(ref args) => cmd::list::run_list(args, output, &project_root),
        Commands::Stats => cmd::stats::run_stats(output, &project_root),
        Commands::NextId => cmd::next_id::run_next_id(output, &project_root),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
