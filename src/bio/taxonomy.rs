/// Bounded taxonomy lookup table and ancestor resolution
use crate::bio::lineage::Lineage;
use crate::core::config::TaxonomyConfig;
use crate::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Field separator in NCBI taxonomy dump files (nodes.dmp)
const FIELD_SEPARATOR: &str = "\t|\t";

/// Upper bound on parent-chain hops during resolution. NCBI lineages are
/// tens of levels deep at most; hitting this means a cyclic or otherwise
/// broken parent chain, which resolves with whatever ranks were seen.
const MAX_WALK_DEPTH: usize = 512;

/// Canonical ranks recorded in a lineage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Species,
    Genus,
    Family,
    Order,
    Class,
    Phylum,
    Unranked,
}

impl Rank {
    /// Parse a rank label from an NCBI taxonomy dump
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "species" => Self::Species,
            "genus" => Self::Genus,
            "family" => Self::Family,
            "order" => Self::Order,
            "class" => Self::Class,
            "phylum" => Self::Phylum,
            _ => Self::Unranked,
        }
    }
}

/// Rank and parent pointer for one taxon id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxonEntry {
    pub rank: Rank,
    pub parent: u32,
}

/// What unseen ids resolve to: no rank, parent outside the table
const ABSENT: TaxonEntry = TaxonEntry {
    rank: Rank::Unranked,
    parent: 0,
};

/// Dense parent/rank table indexed directly by taxon id.
///
/// Ids must lie in `[1, max_taxon_id)`; every access is index-checked and
/// out-of-range ids behave as absent taxa. Built once from a taxonomy
/// dump, then read-only for the rest of the run.
#[derive(Debug)]
pub struct TaxonomyIndex {
    entries: Vec<TaxonEntry>,
    root_id: u32,
    populated: usize,
}

impl TaxonomyIndex {
    /// Create an empty index covering ids in `[1, max_taxon_id)`
    pub fn with_bounds(max_taxon_id: u32, root_taxon_id: u32) -> Self {
        Self {
            entries: vec![ABSENT; max_taxon_id as usize],
            root_id: root_taxon_id,
            populated: 0,
        }
    }

    /// Load a nodes.dmp-style taxonomy dump.
    ///
    /// Expected line format: `taxID\t|\tparentID\t|\trank\t|\t...`;
    /// extra fields are ignored. Malformed lines and out-of-range ids
    /// are skipped, never fatal. Only failure to read the file errors.
    pub fn load<P: AsRef<Path>>(path: P, config: &TaxonomyConfig) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut index = Self::with_bounds(config.max_taxon_id, config.root_taxon_id);

        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
            if parts.len() < 3 {
                debug!("skipping taxonomy line with too few fields");
                continue;
            }

            let (id, parent) = match (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
                (Ok(id), Ok(parent)) => (id, parent),
                _ => {
                    debug!("skipping taxonomy line with non-numeric ids");
                    continue;
                }
            };

            // A rank-only line ends with a bare `\t|` terminator
            let rank = Rank::from_str(parts[2].trim_end_matches("\t|"));
            if !index.insert(id, rank, parent) {
                debug!(id, "skipping out-of-range taxon id");
            }
        }

        Ok(index)
    }

    /// Index-checked insert; returns false for ids outside the table
    pub fn insert(&mut self, id: u32, rank: Rank, parent: u32) -> bool {
        if !self.in_bounds(id) {
            return false;
        }
        self.entries[id as usize] = TaxonEntry { rank, parent };
        self.populated += 1;
        true
    }

    /// Whether an id is usable as a table index
    pub fn in_bounds(&self, id: u32) -> bool {
        id >= 1 && (id as usize) < self.entries.len()
    }

    /// Entry for an id; out-of-range ids read as absent
    pub fn get(&self, id: u32) -> TaxonEntry {
        if self.in_bounds(id) {
            self.entries[id as usize]
        } else {
            ABSENT
        }
    }

    /// Number of entries populated during load
    pub fn taxa_count(&self) -> usize {
        self.populated
    }

    pub fn root_id(&self) -> u32 {
        self.root_id
    }

    /// Resolve the six-rank lineage of a strain by walking leaf to root.
    ///
    /// Each canonical rank keeps the first id observed for it, i.e. the
    /// one nearest the leaf. The walk stops at the configured root id,
    /// at any id <= 2, at an out-of-range id, or at the depth cap; a
    /// truncated walk is not an error and yields whatever was observed.
    pub fn resolve(&self, strain_id: u32) -> Lineage {
        let mut lineage = Lineage::new(strain_id);
        let mut current = strain_id;

        for _ in 0..MAX_WALK_DEPTH {
            if current == self.root_id || current <= 2 || !self.in_bounds(current) {
                break;
            }
            let entry = self.entries[current as usize];
            lineage.record(entry.rank, current);
            current = entry.parent;
        }

        lineage
    }
}
