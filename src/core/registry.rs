/// Strain registration and per-strain lineage cache
use crate::bio::lineage::Lineage;
use crate::bio::taxonomy::TaxonomyIndex;
use crate::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Minimum pipe-delimited fields in a registration token:
/// library label, assembly accession, taxon id, sequence accession
const MIN_FIELDS: usize = 4;

/// Lineages for every registered strain, keyed by taxon id.
///
/// Built from the registration manifest, then read-only.
#[derive(Debug, Default)]
pub struct StrainRegistry {
    lineages: HashMap<u32, Lineage>,
}

impl StrainRegistry {
    /// Load a registration manifest, resolving each strain's lineage.
    ///
    /// Tokens are whitespace-separated, each of the form
    /// `LABEL|ACCESSION|taxid|SEQID`. Bad tokens are skipped; only
    /// failure to read the file errors.
    pub fn load<P: AsRef<Path>>(path: P, index: &TaxonomyIndex) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut registry = Self::default();
        for token in contents.split_whitespace() {
            registry.register(token, index);
        }
        Ok(registry)
    }

    /// Register one strain token. A later token for the same taxon id
    /// overwrites the earlier entry (last registration is authoritative).
    pub fn register(&mut self, token: &str, index: &TaxonomyIndex) {
        let fields: Vec<&str> = token.split('|').collect();
        if fields.len() < MIN_FIELDS {
            debug!(token, "skipping registration token with too few fields");
            return;
        }

        let id = match fields[2].parse::<u32>() {
            Ok(id) if index.in_bounds(id) => id,
            _ => {
                debug!(token, "skipping registration token with bad taxon id");
                return;
            }
        };

        self.lineages.insert(id, index.resolve(id));
    }

    pub fn get(&self, id: u32) -> Option<&Lineage> {
        self.lineages.get(&id)
    }

    pub fn len(&self) -> usize {
        self.lineages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lineages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::taxonomy::Rank;

    fn small_index() -> TaxonomyIndex {
        let mut index = TaxonomyIndex::with_bounds(10_000, 131_567);
        index.insert(9606, Rank::Species, 9605);
        index.insert(9605, Rank::Genus, 131_567);
        index
    }

    #[test]
    fn test_register_resolves_lineage() {
        let index = small_index();
        let mut registry = StrainRegistry::default();
        registry.register("CDKAM|GCF_001|9606|NC_001", &index);

        let lineage = registry.get(9606).unwrap();
        assert_eq!(lineage.species_id(), 9606);
        assert_eq!(lineage.genus_id(), Some(9605));
    }

    #[test]
    fn test_register_skips_short_tokens() {
        let index = small_index();
        let mut registry = StrainRegistry::default();
        registry.register("CDKAM|GCF_001|9606", &index);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_skips_bad_ids() {
        let index = small_index();
        let mut registry = StrainRegistry::default();
        registry.register("CDKAM|GCF_001|zero|NC_001", &index);
        registry.register("CDKAM|GCF_001|-5|NC_001", &index);
        registry.register("CDKAM|GCF_001|0|NC_001", &index);
        registry.register("CDKAM|GCF_001|9999999|NC_001", &index);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_last_registration_wins() {
        let index = small_index();
        let mut registry = StrainRegistry::default();
        registry.register("CDKAM|GCF_001|9606|NC_001", &index);
        registry.register("CDKAM|GCF_002|9606|NC_002", &index);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(9606).is_some());
    }

    #[test]
    fn test_load_splits_on_whitespace() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CDKAM|GCF_001|9606|NC_001 CDKAM|GCF_002|9605|NC_002").unwrap();
        writeln!(file, "short|token").unwrap();

        let index = small_index();
        let registry = StrainRegistry::load(file.path(), &index).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get(9606).is_some());
        assert!(registry.get(9605).is_some());
    }
}
