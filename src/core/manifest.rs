/// Deduplicated, lineage-annotated manifest of reference files
use crate::bio::lineage::Lineage;
use crate::core::registry::StrainRegistry;
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One (reference file, taxon id) pair destined for the manifest.
///
/// Equality and ordering are on the exact pair: the same file may appear
/// with different ids when headers disagree, which is a data anomaly but
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ManifestEntry {
    pub path: String,
    pub taxon_id: u32,
}

impl ManifestEntry {
    pub fn new(path: impl Into<String>, taxon_id: u32) -> Self {
        Self {
            path: path.into(),
            taxon_id,
        }
    }
}

/// Write one tab-separated row per distinct (path, id) pair, sorted by
/// path bytes: path, taxon id, then the six lineage columns. Ids that
/// were never registered degrade to a row of unknown sentinels.
///
/// Returns the number of rows written.
pub fn write_manifest<P: AsRef<Path>>(
    mut entries: Vec<ManifestEntry>,
    registry: &StrainRegistry,
    path: P,
) -> Result<usize> {
    entries.sort();
    entries.dedup();

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for entry in &entries {
        let columns = match registry.get(entry.taxon_id) {
            Some(lineage) => lineage.to_columns(),
            None => Lineage::unknown_columns(),
        };
        writeln!(writer, "{}\t{}\t{}", entry.path, entry.taxon_id, columns)?;
    }
    writer.flush()?;

    Ok(entries.len())
}
