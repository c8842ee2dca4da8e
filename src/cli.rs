use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,   // global --quiet
    pub dry_run: bool, // global --dry-run
}

#[derive(Parser)]
#[command(name = "resite")]
#[command(about = "Rewrite call sites of one function across a codebase, driven by a usage report")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress the run summary and non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Run the full pipeline without writing any file
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite every call site listed in the usage report
    Rewrite(RewriteArgs),

    /// Parse the usage report and print the sorted canonical addresses
    Locations(LocationsArgs),

    /// Initialize a resite.toml config file
    Init(InitArgs),
}

#[derive(Parser)]
pub struct RewriteArgs {
    /// Usage report file (overrides config)
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Root directory the report's paths are relative to
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Function whose call sites are rewritten (overrides config)
    #[arg(short, long)]
    pub function: Option<String>,

    /// Replacement function name (overrides config)
    #[arg(long)]
    pub replacement: Option<String>,

    /// Number of leading arguments kept in the rewritten call
    #[arg(long)]
    pub keep_args: Option<usize>,

    /// Diagnostic function receiving the dropped arguments (empty disables)
    #[arg(long)]
    pub diagnostic: Option<String>,
}

#[derive(Parser)]
pub struct LocationsArgs {
    /// Usage report file (overrides config)
    #[arg(short, long)]
    pub report: Option<PathBuf>,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to place resite.toml in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}
