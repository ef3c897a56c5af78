use clap::Parser;
use colored::*;
use std::process;
use taxsplit::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // TAXSPLIT_LOG takes precedence over -v flags
    let log_level = std::env::var("TAXSPLIT_LOG").unwrap_or_else(|_| {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
        .to_string()
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<taxsplit::TaxsplitError>() {
            Some(taxsplit::TaxsplitError::Config(_)) => 2,
            Some(taxsplit::TaxsplitError::Io(_)) => 3,
            Some(taxsplit::TaxsplitError::Parse(_)) => 4,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Partition(args) => taxsplit::cli::commands::partition::run(args),
        Commands::Lineage(args) => taxsplit::cli::commands::lineage::run(args),
    }
}
