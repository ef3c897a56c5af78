use crate::bio::taxonomy::TaxonomyIndex;
use crate::core::config::{self, Config};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct LineageArgs {
    /// NCBI-style taxonomy dump (nodes.dmp)
    #[arg(value_name = "TAXONOMY")]
    pub taxonomy: PathBuf,

    /// Taxon id to resolve
    #[arg(value_name = "TAXON_ID")]
    pub taxon_id: u32,

    /// Configuration file (TOML); built-in defaults apply when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: LineageArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };

    let index = TaxonomyIndex::load(&args.taxonomy, &config.taxonomy)?;
    let lineage = index.resolve(args.taxon_id);
    println!("{}\t{}", args.taxon_id, lineage.to_columns());

    Ok(())
}
