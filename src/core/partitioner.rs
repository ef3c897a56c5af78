/// Streaming split of a sequence library into per-strain reference files
use crate::core::config::Config;
use crate::core::manifest::ManifestEntry;
use crate::Result;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// First character of a record header line
pub const HEADER_MARKER: char = '>';

/// Minimum tokens in a header: library label, assembly accession,
/// taxon id, sequence accession
const MIN_HEADER_TOKENS: usize = 4;

/// Counters and manifest entries accumulated over one partitioning pass
#[derive(Debug)]
pub struct PartitionOutcome {
    pub entries: Vec<ManifestEntry>,
    pub records_written: usize,
    pub records_discarded: usize,
}

/// Splits a sequence library into per-strain files under the references
/// directory, holding at most one record's body in memory.
///
/// Destination files are opened in append mode per record, so records
/// for the same strain need not be contiguous in the library; a record's
/// full text is written before the next record is read.
pub struct Partitioner {
    references_dir: PathBuf,
    max_taxon_id: u32,
    entries: Vec<ManifestEntry>,
    records_written: usize,
    records_discarded: usize,
}

impl Partitioner {
    pub fn new(out_root: &Path, config: &Config) -> Self {
        Self {
            references_dir: out_root.join(&config.output.references_subdir),
            max_taxon_id: config.taxonomy.max_taxon_id,
            entries: Vec::new(),
            records_written: 0,
            records_discarded: 0,
        }
    }

    /// Stream the library once, flushing each record as it completes.
    ///
    /// A record is a header line (starting with `>`) plus all following
    /// non-header lines. Empty lines are skipped wherever they occur,
    /// and body lines before the first header belong to no record and
    /// are dropped. The final record is flushed at end of input.
    pub fn run<P: AsRef<Path>>(mut self, library: P) -> Result<PartitionOutcome> {
        let file = File::open(library)?;
        let reader = BufReader::new(file);

        let mut header: Option<String> = None;
        let mut body: Vec<String> = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            if line.starts_with(HEADER_MARKER) {
                if let Some(prev) = header.take() {
                    self.flush_record(&prev, &body)?;
                }
                body.clear();
                header = Some(line);
            } else if header.is_some() {
                body.push(line);
            }
        }
        if let Some(prev) = header.take() {
            self.flush_record(&prev, &body)?;
        }

        Ok(PartitionOutcome {
            entries: self.entries,
            records_written: self.records_written,
            records_discarded: self.records_discarded,
        })
    }

    /// Append one record to its destination file and collect the
    /// (path, id) pair. Records with malformed headers are discarded
    /// whole; destination write failures are fatal.
    fn flush_record(&mut self, header: &str, body: &[String]) -> Result<()> {
        let tokens: Vec<&str> = header.split(|c: char| c == '|' || c == ' ').collect();
        if tokens.len() < MIN_HEADER_TOKENS {
            debug!(header, "discarding record with too few header tokens");
            self.records_discarded += 1;
            return Ok(());
        }

        let id = match tokens[2].parse::<u32>() {
            Ok(id) if id >= 1 && id < self.max_taxon_id => id,
            _ => {
                debug!(header, "discarding record with bad taxon id");
                self.records_discarded += 1;
                return Ok(());
            }
        };

        let file_name = format!("{}|{}|{}.txt", tokens[1], tokens[2], tokens[3]);
        let dest = self.references_dir.join(file_name);

        let file = OpenOptions::new().create(true).append(true).open(&dest)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", header)?;
        for line in body {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;

        self.entries
            .push(ManifestEntry::new(dest.to_string_lossy().into_owned(), id));
        self.records_written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn run_on(library: &str) -> (tempfile::TempDir, PartitionOutcome) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        fs::create_dir_all(dir.path().join(&config.output.references_subdir)).unwrap();

        let library_path = dir.path().join("library.fna");
        fs::write(&library_path, library).unwrap();

        let outcome = Partitioner::new(dir.path(), &config)
            .run(&library_path)
            .unwrap();
        (dir, outcome)
    }

    #[test]
    fn test_records_routed_by_header() {
        let (dir, outcome) = run_on(
            ">CDKAM|GCF_001|9606|NC_001\nACGT\nTTTT\n>CDKAM|GCF_002|9605|NC_002\nGGGG\n",
        );
        assert_eq!(outcome.records_written, 2);
        assert_eq!(outcome.records_discarded, 0);

        let first = dir.path().join("references/GCF_001|9606|NC_001.txt");
        let contents = fs::read_to_string(first).unwrap();
        assert_eq!(contents, ">CDKAM|GCF_001|9606|NC_001\nACGT\nTTTT\n");
    }

    #[test]
    fn test_final_record_is_flushed() {
        let (dir, outcome) = run_on(">CDKAM|GCF_001|9606|NC_001\nACGT");
        assert_eq!(outcome.records_written, 1);

        let contents =
            fs::read_to_string(dir.path().join("references/GCF_001|9606|NC_001.txt")).unwrap();
        assert_eq!(contents, ">CDKAM|GCF_001|9606|NC_001\nACGT\n");
    }

    #[test]
    fn test_noncontiguous_records_append() {
        let (dir, outcome) = run_on(
            ">CDKAM|GCF_001|9606|NC_001\nAAAA\n>CDKAM|GCF_002|9605|NC_002\nCCCC\n>CDKAM|GCF_001|9606|NC_001\nGGGG\n",
        );
        assert_eq!(outcome.records_written, 3);
        // Two entries for the same destination; dedup happens later
        assert_eq!(outcome.entries.len(), 3);

        let contents =
            fs::read_to_string(dir.path().join("references/GCF_001|9606|NC_001.txt")).unwrap();
        assert_eq!(
            contents,
            ">CDKAM|GCF_001|9606|NC_001\nAAAA\n>CDKAM|GCF_001|9606|NC_001\nGGGG\n"
        );
    }

    #[test]
    fn test_malformed_header_discards_whole_record() {
        let (dir, outcome) = run_on(
            ">broken header\nAAAA\nCCCC\n>CDKAM|GCF_001|9606|NC_001\nGGGG\n",
        );
        assert_eq!(outcome.records_written, 1);
        assert_eq!(outcome.records_discarded, 1);

        // The discarded body must not leak into the next record
        let contents =
            fs::read_to_string(dir.path().join("references/GCF_001|9606|NC_001.txt")).unwrap();
        assert_eq!(contents, ">CDKAM|GCF_001|9606|NC_001\nGGGG\n");
    }

    #[test]
    fn test_out_of_range_id_discards_record() {
        let (_dir, outcome) = run_on(">CDKAM|GCF_001|9999999|NC_001\nACGT\n");
        assert_eq!(outcome.records_written, 0);
        assert_eq!(outcome.records_discarded, 1);
        assert!(outcome.entries.is_empty());
    }

    #[test]
    fn test_empty_lines_and_leading_body_skipped() {
        let (dir, outcome) = run_on("AAAA\n\n>CDKAM|GCF_001|9606|NC_001\n\nACGT\n\n");
        assert_eq!(outcome.records_written, 1);

        let contents =
            fs::read_to_string(dir.path().join("references/GCF_001|9606|NC_001.txt")).unwrap();
        assert_eq!(contents, ">CDKAM|GCF_001|9606|NC_001\nACGT\n");
    }

    #[test]
    fn test_header_with_description_after_space() {
        let (dir, outcome) =
            run_on(">CDKAM|GCF_001|9606|NC_001 Homo sapiens chromosome 1\nACGT\n");
        assert_eq!(outcome.records_written, 1);

        // Tokens after the fourth do not affect the destination
        let contents =
            fs::read_to_string(dir.path().join("references/GCF_001|9606|NC_001.txt")).unwrap();
        assert!(contents.starts_with(">CDKAM|GCF_001|9606|NC_001 Homo sapiens"));
    }
}
