use crate::bio::taxonomy::TaxonomyIndex;
use crate::core::config::{self, Config};
use crate::core::manifest::write_manifest;
use crate::core::partitioner::Partitioner;
use crate::core::registry::StrainRegistry;
use clap::Args;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct PartitionArgs {
    /// Strain registration manifest
    #[arg(value_name = "REGISTRY")]
    pub registry: PathBuf,

    /// NCBI-style taxonomy dump (nodes.dmp)
    #[arg(value_name = "TAXONOMY")]
    pub taxonomy: PathBuf,

    /// Multi-record genome sequence library
    #[arg(value_name = "LIBRARY")]
    pub library: PathBuf,

    /// Output root directory
    #[arg(value_name = "OUTPUT_DIR")]
    pub output: PathBuf,

    /// Configuration file (TOML); built-in defaults apply when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: PartitionArgs) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };

    // Show progress while the multi-million-line dump loads
    let loading_pb = ProgressBar::new_spinner();
    loading_pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    loading_pb.set_message(format!("Loading taxonomy from {}...", args.taxonomy.display()));

    let index = TaxonomyIndex::load(&args.taxonomy, &config.taxonomy)?;
    loading_pb.finish_with_message(format!("Loaded {} taxa", index.taxa_count()));

    let registry = StrainRegistry::load(&args.registry, &index)?;
    info!(strains = registry.len(), "strains registered");

    fs::create_dir_all(args.output.join(&config.output.references_subdir))?;
    let outcome = Partitioner::new(&args.output, &config).run(&args.library)?;
    info!(
        written = outcome.records_written,
        discarded = outcome.records_discarded,
        "library partitioned"
    );

    let manifest_path = args.output.join(&config.output.manifest_name);
    if let Some(parent) = manifest_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let rows = write_manifest(outcome.entries, &registry, &manifest_path)?;
    info!(rows, manifest = %manifest_path.display(), "manifest written");

    Ok(())
}
