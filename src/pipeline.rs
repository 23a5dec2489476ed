/* crate use */
use log::{debug, info};

/* project use */
use crate::count::{CountTable, Snapshot};
use crate::error;
use crate::index::{self, header_name, IndexRecord};
use crate::kmer;
use crate::reader::{self, Line};
use crate::scheduler::Scheduler;
use crate::writer::{self, OutputFormat};

/// Parameter of a kmer counting run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Fasta file, must be a regular file
    pub source: std::path::PathBuf,
    /// Kmer length, larger than 0
    pub kmer_size: usize,
    /// Number of workers, 0 use all cpus
    pub threads: usize,
    /// Output format
    pub format: OutputFormat,
    /// Stream records line by line instead of load them in memory
    pub streaming: bool,
}

impl Config {
    /// Validate parameters
    pub fn new<P>(
        source: P,
        kmer_size: usize,
        threads: usize,
        format: OutputFormat,
    ) -> error::Result<Self>
    where
        P: AsRef<std::path::Path>,
    {
        let source = source.as_ref().to_path_buf();

        if kmer_size == 0 {
            return Err(error::Error::KmerSize);
        }

        if !source.is_file() {
            return Err(error::Error::NotAFile { path: source });
        }

        Ok(Self {
            source,
            kmer_size,
            threads,
            format,
            streaming: false,
        })
    }

    /// Enable or disable streaming of records
    pub fn streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Path where counts will be written
    pub fn output_path(&self) -> std::path::PathBuf {
        writer::output_path(&self.source, self.kmer_size, self.format)
    }
}

/// Load (or build) index, count kmer of every record and write counts, return output path
pub fn run(config: &Config) -> error::Result<std::path::PathBuf> {
    info!("Reading index");
    let index = index::ensure(&config.source)?;

    let scheduler = Scheduler::new(config.threads);
    info!(
        "Counting {}-mers of {} records with {} threads",
        config.kmer_size,
        index.len(),
        scheduler.threads()
    );

    let snapshot = count_kmers(
        &config.source,
        &index,
        config.kmer_size,
        &scheduler,
        config.streaming,
    )?;
    info!(
        "Done counting, {} kmers {} unique",
        snapshot.total,
        snapshot.len()
    );

    let output = config.output_path();
    info!("Saving to {}", output.display());

    writer::save(output, &snapshot.counts, config.format)
}

/// Count canonical kmer of all records of index
pub fn count_kmers<P>(
    source: P,
    index: &[IndexRecord],
    k: usize,
    scheduler: &Scheduler,
    streaming: bool,
) -> error::Result<Snapshot>
where
    P: AsRef<std::path::Path>,
{
    let source = source.as_ref();
    let table = CountTable::new(k);

    scheduler.run(index, |record| {
        let result = if streaming {
            stream_record(source, record, &table)
        } else {
            count_record(source, record, &table)
        };

        result.map_err(|e| e.in_record(&record.name, record.offset))
    })?;

    table.snapshot()
}

/// Load record in memory, check it, and add its kmer to table
pub fn count_record<P>(source: P, record: &IndexRecord, table: &CountTable) -> error::Result<()>
where
    P: AsRef<std::path::Path>,
{
    let mut sequence = reader::read_at(source, record.offset)?;
    sequence.check(record)?;

    kmer::normalize(&mut sequence.residues)?;
    kmer::for_each_canonical(&sequence.residues, table.k(), |kmer| table.increment(kmer))?;

    debug!("record {:?} counted", record.name);

    Ok(())
}

/// Add kmer of record to table without load it, record is checked after reading
pub fn stream_record<P>(source: P, record: &IndexRecord, table: &CountTable) -> error::Result<()>
where
    P: AsRef<std::path::Path>,
{
    let source = source.as_ref();

    let mut extractor = kmer::StreamExtractor::new(table.k());
    let mut name = None;
    let mut length = 0;
    let mut failure = None;

    reader::read_at_with(source, record.offset, |line| match line {
        Line::Header(header) => {
            name = Some(header_name(header).map(str::to_string));
            true
        }
        Line::Residues(residues) => {
            length += residues.len() as u64;
            match extractor.feed(residues, |kmer| table.increment(kmer)) {
                Ok(()) => true,
                Err(e) => {
                    failure = Some(e);
                    false
                }
            }
        }
    })?;

    if let Some(e) = failure {
        return Err(e);
    }

    let name = name
        .flatten()
        .ok_or_else(|| error::Error::NameEncoding {
            path: source.to_path_buf(),
            line: 1,
        })?;
    record.check(&name, length)?;

    debug!("record {:?} counted", record.name);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::ErrorKind;
    use crate::kmer::Kmers;

    const TWO_RECORDS: &[u8] = b">s1\nACGTACGT\n>s2\nTTTTGGGG\n";

    fn expected_two_records() -> Kmers {
        [
            ("AAAA", 1),
            ("ACGT", 2),
            ("CAAA", 1),
            ("CCAA", 1),
            ("CCCA", 1),
            ("CCCC", 1),
            ("CGTA", 2),
            ("GTAC", 1),
        ]
        .iter()
        .map(|(kmer, count)| (kmer.as_bytes().to_vec(), *count))
        .collect()
    }

    #[test]
    fn two_records_any_concurrency() {
        let file = crate::tests::fasta(TWO_RECORDS);
        let index = index::ensure(&file).unwrap();

        for threads in [1, 4] {
            for streaming in [false, true] {
                let snapshot =
                    count_kmers(&file, &index, 4, &Scheduler::new(threads), streaming).unwrap();

                assert_eq!(snapshot.counts, expected_two_records());
                assert_eq!(snapshot.total, 10);
            }
        }
    }

    #[test]
    fn streaming_match_loading() {
        let file = crate::tests::generate_fasta(42, 50, 500);
        let index = index::ensure(&file).unwrap();
        let scheduler = Scheduler::new(4);

        for k in [3, 11, 21] {
            let loaded = count_kmers(&file, &index, k, &scheduler, false).unwrap();
            let streamed = count_kmers(&file, &index, k, &scheduler, true).unwrap();

            assert_eq!(loaded, streamed);
            assert_eq!(loaded.total, 50 * (500 - k as u64 + 1));
        }
    }

    #[test]
    fn lowercase_and_ambiguous() {
        let file = crate::tests::fasta(b">s1\nacgNAC\nGT\n");
        let index = index::ensure(&file).unwrap();

        for streaming in [false, true] {
            let snapshot = count_kmers(&file, &index, 4, &Scheduler::new(2), streaming).unwrap();

            assert_eq!(snapshot.total, 1);
            assert_eq!(snapshot.counts[&b"ACGT"[..]], 1);
        }
    }

    #[test]
    fn invalid_residue_abort() {
        let file = crate::tests::fasta(b">s1\nACGT\n>s2\nACRT\n");
        let index = index::ensure(&file).unwrap();

        for streaming in [false, true] {
            let err = count_kmers(&file, &index, 2, &Scheduler::new(2), streaming).unwrap_err();

            assert_eq!(err.kind(), ErrorKind::InvalidResidue);
            assert!(matches!(err, error::Error::Record { ref name, offset: 9, .. } if name == "s2"));
        }
    }

    #[test]
    fn stale_index_abort() {
        let file = crate::tests::fasta(TWO_RECORDS);
        index::ensure(&file).unwrap();

        // same offsets, first record one residue shorter
        std::fs::write(&file.path, b">s1\nACGTACG\n\n>s2\nTTTTGGGG\n").unwrap();
        let index = index::ensure(&file).unwrap();
        assert_eq!(index[1].offset, 13);

        for streaming in [false, true] {
            let err = count_kmers(&file, &index, 4, &Scheduler::new(2), streaming).unwrap_err();

            assert_eq!(err.kind(), ErrorKind::Integrity);
            assert!(matches!(err, error::Error::Record { ref name, .. } if name == "s1"));
        }
    }

    #[test]
    fn config() {
        let file = crate::tests::fasta(TWO_RECORDS);

        assert_eq!(
            Config::new(&file, 0, 0, OutputFormat::Csv).unwrap_err().kind(),
            ErrorKind::Config
        );
        assert_eq!(
            Config::new(file.dir.path(), 4, 0, OutputFormat::Csv)
                .unwrap_err()
                .kind(),
            ErrorKind::Config
        );

        let config = Config::new(&file, 4, 0, OutputFormat::Csv).unwrap();
        assert!(!config.streaming);
        assert!(config.clone().streaming(true).streaming);
        assert_eq!(
            config.output_path(),
            file.dir.path().join("input.fasta_4.kmers.csv")
        );
    }

    #[test]
    fn run_write_output() {
        let file = crate::tests::fasta(TWO_RECORDS);

        for format in OutputFormat::ALL {
            let config = Config::new(&file, 4, 2, format).unwrap();
            let output = run(&config).unwrap();

            let content = std::fs::read_to_string(&output).unwrap();
            match format {
                OutputFormat::Csv => assert_eq!(
                    content,
                    "AAAA\t1\nACGT\t2\nCAAA\t1\nCCAA\t1\nCCCA\t1\nCCCC\t1\nCGTA\t2\nGTAC\t1\n"
                ),
                OutputFormat::List => assert_eq!(
                    content,
                    "AAAA\nACGT\nCAAA\nCCAA\nCCCA\nCCCC\nCGTA\nGTAC\n"
                ),
                OutputFormat::Fasta => {
                    assert!(content.starts_with(">1 count: 1\nAAAA\n\n>2 count: 2\nACGT\n\n"));
                    assert_eq!(content.matches('>').count(), 8);
                }
            }
        }

        assert!(index::sidecar_path(&file).is_file());
    }

    #[test]
    fn repeated_run_same_output() {
        let file = crate::tests::generate_fasta(7, 20, 300);

        for format in OutputFormat::ALL {
            let config = Config::new(&file, 7, 3, format).unwrap();

            let first = std::fs::read(run(&config).unwrap()).unwrap();
            let second = std::fs::read(run(&config).unwrap()).unwrap();
            let streamed = std::fs::read(run(&config.clone().streaming(true)).unwrap()).unwrap();

            assert!(!first.is_empty());
            assert_eq!(first, second);
            assert_eq!(first, streamed);
        }
    }
}
