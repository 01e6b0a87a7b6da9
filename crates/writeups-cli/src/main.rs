#![forbid(unsafe_code)]

mod cmd;
mod fetch;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "wu: personal catalog browser for security write-ups",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Data directory for the catalog cache and user state.
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }

    /// Resolve the data directory: flag, then `WRITEUPS_DIR`, then the
    /// platform data dir, then `.writeups` in the working directory.
    fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        if let Ok(dir) = env::var("WRITEUPS_DIR") {
            return PathBuf::from(dir);
        }
        dirs::data_dir()
            .map_or_else(|| PathBuf::from(".writeups"), |d| d.join("writeups"))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Browse",
        about = "List write-ups with filters and pagination",
        long_about = "List catalog write-ups with optional filters, search, sort, and paging.",
        after_help = "EXAMPLES:\n    # Latest page, default sort\n    wu list\n\n    # Unread SSRF write-ups over $1000\n    wu list --unread --tag SSRF --min-bounty 1000\n\n    # Emit machine-readable output\n    wu list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Browse",
        about = "Distinct authors, programs, and tags",
        long_about = "Print the distinct author, program, and tag values in the catalog.",
        after_help = "EXAMPLES:\n    # All facet values\n    wu facets\n\n    # Emit machine-readable output\n    wu facets --json"
    )]
    Facets(cmd::facets::FacetsArgs),

    #[command(
        next_help_heading = "Ledger",
        about = "Toggle a write-up's read mark",
        long_about = "Toggle read state for a write-up, recording the read timestamp.",
        after_help = "EXAMPLES:\n    # By URL (identity key)\n    wu read https://example.com/post\n\n    # By unique title fragment\n    wu read \"media proxy\""
    )]
    Read(cmd::read::ReadArgs),

    #[command(
        next_help_heading = "Ledger",
        about = "Set, show, or clear a note",
        long_about = "Attach a free-text note to a write-up, print it, or remove it.",
        after_help = "EXAMPLES:\n    # Save a note\n    wu note https://example.com/post \"clever auth bypass\"\n\n    # Show the note\n    wu note https://example.com/post\n\n    # Remove it\n    wu note https://example.com/post --clear"
    )]
    Note(cmd::note::NoteArgs),

    #[command(
        next_help_heading = "Activity",
        about = "Render the read-activity heatmap",
        long_about = "Render a 54-week calendar grid of daily read counts.",
        after_help = "EXAMPLES:\n    # Current grid\n    wu heatmap\n\n    # Emit machine-readable output\n    wu heatmap --json"
    )]
    Heatmap(cmd::heatmap::HeatmapArgs),

    #[command(
        next_help_heading = "Activity",
        about = "List everything read on one day",
        long_about = "List the write-ups whose read timestamp falls on a UTC calendar day.",
        after_help = "EXAMPLES:\n    wu day 2026-08-01\n\n    # Emit machine-readable output\n    wu day 2026-08-01 --json"
    )]
    Day(cmd::day::DayArgs),

    #[command(
        next_help_heading = "Activity",
        about = "Overall and weekly read progress",
        after_help = "EXAMPLES:\n    wu progress\n\n    # Emit machine-readable output\n    wu progress --json"
    )]
    Progress(cmd::progress::ProgressArgs),

    #[command(
        next_help_heading = "Catalog",
        about = "Fetch the catalog and replace the cache",
        long_about = "Fetch the write-up catalog from its source and replace the local cache.",
        after_help = "EXAMPLES:\n    # Default source\n    wu refresh\n\n    # A mirror\n    wu refresh --url https://mirror.example/writeups.json"
    )]
    Refresh(cmd::refresh::RefreshArgs),

    #[command(
        next_help_heading = "Backup",
        about = "Export user state as JSON",
        after_help = "EXAMPLES:\n    # To stdout\n    wu export\n\n    # To a file\n    wu export --output backup.json"
    )]
    Export(cmd::export::ExportArgs),

    #[command(
        next_help_heading = "Backup",
        about = "Merge an exported document into local state",
        long_about = "Merge a previously exported document: newer read marks win, notes never overwrite local ones.",
        after_help = "EXAMPLES:\n    wu import backup.json"
    )]
    Import(cmd::import::ImportArgs),

    #[command(
        next_help_heading = "Settings",
        about = "Show or update persisted settings",
        after_help = "EXAMPLES:\n    # Show current settings\n    wu config\n\n    # Change the default sort and weekly goal\n    wu config --sort bounty_desc --weekly-goal 5"
    )]
    Config(cmd::config::ConfigArgs),
}

fn init_tracing(quiet: bool) {
    let filter = EnvFilter::try_from_env("WRITEUPS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if quiet {
            "error"
        } else if env::var("DEBUG").is_ok() {
            "writeups=debug,info"
        } else {
            "writeups=info,warn"
        })
    });

    let format = env::var("WRITEUPS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let data_dir = cli.resolve_data_dir();
    let output = cli.output_mode();

    match cli.command {
        Commands::List(args) => cmd::list::run_list(&args, output, &data_dir),
        Commands::Facets(args) => cmd::facets::run_facets(&args, output, &data_dir),
        Commands::Read(args) => cmd::read::run_read(&args, output, &data_dir),
        Commands::Note(args) => cmd::note::run_note(&args, output, &data_dir),
        Commands::Heatmap(args) => cmd::heatmap::run_heatmap(&args, output, &data_dir),
        Commands::Day(args) => cmd::day::run_day(&args, output, &data_dir),
        Commands::Progress(args) => cmd::progress::run_progress(&args, output, &data_dir),
        Commands::Refresh(args) => cmd::refresh::run_refresh(&args, output, &data_dir),
        Commands::Export(args) => cmd::export::run_export(&args, output, &data_dir),
        Commands::Import(args) => cmd::import::run_import(&args, output, &data_dir),
        Commands::Config(args) => cmd::config::run_config(&args, output, &data_dir),
    }
}
