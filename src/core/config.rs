use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub taxonomy: TaxonomyConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Exclusive upper bound for indexable taxon ids
    pub max_taxon_id: u32,
    /// Taxon id at which the ancestor walk stops. The standard NCBI dump
    /// roots cellular organisms at 131567; viral or custom taxonomies
    /// may use a different root.
    pub root_taxon_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Subdirectory of the output root receiving per-strain files
    pub references_subdir: String,
    /// Manifest location, relative to the output root
    pub manifest_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            taxonomy: TaxonomyConfig {
                max_taxon_id: 3_000_005,
                root_taxon_id: 131_567,
            },
            output: OutputConfig {
                references_subdir: "references".to_string(),
                manifest_name: "build/paths.txt".to_string(),
            },
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, crate::TaxsplitError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| crate::TaxsplitError::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), crate::TaxsplitError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| crate::TaxsplitError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
