use anyhow::Result;
use clap::Parser;
use resite::cli::{AppContext, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Rewrite(args) => resite::rewrite_run(args, &ctx),
        Commands::Locations(args) => resite::locations_run(args, &ctx),
        Commands::Init(args) => resite::infra::config::init(args, &ctx),
    }
}
