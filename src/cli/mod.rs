pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "taxsplit",
    version,
    about = "Split a genome sequence library into per-strain reference files",
    long_about = "Taxsplit streams a multi-record genome library into one reference file per \
                  registered strain and writes a manifest mapping each file to its full \
                  taxonomic lineage, as preprocessing for downstream classifiers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Partition a sequence library into per-strain reference files
    Partition(commands::partition::PartitionArgs),

    /// Resolve and print the lineage of a single taxon id
    Lineage(commands::lineage::LineageArgs),
}
