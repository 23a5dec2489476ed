/* std use */
use std::io::Write;

/* project use */
use crate::atomic::AtomicFile;
use crate::error;
use crate::kmer::Kmers;

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `>{ordinal} count: {count}\n{kmer}\n\n` per kmer
    Fasta,
    /// one kmer per line, no count
    List,
    /// `{kmer}\t{count}` per line
    Csv,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Fasta, OutputFormat::List, OutputFormat::Csv];

    /// Name of format, also used as file extension
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Fasta => "fasta",
            OutputFormat::List => "list",
            OutputFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = error::Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .iter()
            .find(|format| format.name() == name)
            .copied()
            .ok_or_else(|| error::Error::UnknownFormat {
                name: name.to_string(),
            })
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Output path of a run: `<source>_<k>.kmers.<format>`
pub fn output_path<P>(source: P, k: usize, format: OutputFormat) -> std::path::PathBuf
where
    P: AsRef<std::path::Path>,
{
    let mut path = source.as_ref().as_os_str().to_owned();
    path.push(format!("_{}.kmers.{}", k, format));

    std::path::PathBuf::from(path)
}

/// Write counts in output, kmers are emitted in lexicographic order
pub fn write_counts<W>(output: &mut W, counts: &Kmers, format: OutputFormat) -> std::io::Result<()>
where
    W: std::io::Write,
{
    let mut kmers = counts.iter().collect::<Vec<(&Vec<u8>, &u64)>>();
    kmers.sort_unstable_by(|a, b| a.0.cmp(b.0));

    for (ordinal, (kmer, count)) in kmers.into_iter().enumerate() {
        match format {
            OutputFormat::Fasta => {
                writeln!(output, ">{} count: {}", ordinal + 1, count)?;
                output.write_all(kmer)?;
                output.write_all(b"\n\n")?;
            }
            OutputFormat::List => {
                output.write_all(kmer)?;
                output.write_all(b"\n")?;
            }
            OutputFormat::Csv => {
                output.write_all(kmer)?;
                writeln!(output, "\t{}", count)?;
            }
        }
    }

    Ok(())
}

/// Write counts in target through a temporary file
pub fn save<P>(target: P, counts: &Kmers, format: OutputFormat) -> error::Result<std::path::PathBuf>
where
    P: AsRef<std::path::Path>,
{
    let mut output = AtomicFile::create(target)?;

    output.write_with(|out| {
        write_counts(out, counts, format)?;
        out.flush()
    })?;

    output.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::ErrorKind;

    fn counts() -> Kmers {
        [("CGTA", 2), ("AAAA", 1), ("ACGT", 2)]
            .iter()
            .map(|(kmer, count)| (kmer.as_bytes().to_vec(), *count))
            .collect()
    }

    fn written(format: OutputFormat) -> String {
        let mut output = Vec::new();
        write_counts(&mut output, &counts(), format).unwrap();

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn format_name() {
        assert_eq!("fasta".parse::<OutputFormat>().unwrap(), OutputFormat::Fasta);
        assert_eq!("list".parse::<OutputFormat>().unwrap(), OutputFormat::List);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!(
            "tsv".parse::<OutputFormat>().unwrap_err().kind(),
            ErrorKind::Config
        );
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn path() {
        assert_eq!(
            output_path("data/genome.fa", 21, OutputFormat::Csv),
            std::path::PathBuf::from("data/genome.fa_21.kmers.csv")
        );
    }

    #[test]
    fn fasta() {
        assert_eq!(
            written(OutputFormat::Fasta),
            ">1 count: 1\nAAAA\n\n>2 count: 2\nACGT\n\n>3 count: 2\nCGTA\n\n"
        );
    }

    #[test]
    fn list() {
        assert_eq!(written(OutputFormat::List), "AAAA\nACGT\nCGTA\n");
    }

    #[test]
    fn csv() {
        assert_eq!(written(OutputFormat::Csv), "AAAA\t1\nACGT\t2\nCGTA\t2\n");
    }

    #[test]
    fn save_() {
        let dir = tempfile::tempdir().unwrap();
        let target = output_path(dir.path().join("input.fasta"), 4, OutputFormat::Csv);

        save(&target, &counts(), OutputFormat::Csv).unwrap();

        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "AAAA\t1\nACGT\t2\nCGTA\t2\n"
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn empty() {
        for format in OutputFormat::ALL {
            let mut output = Vec::new();
            write_counts(&mut output, &Kmers::default(), format).unwrap();

            assert!(output.is_empty());
        }
    }
}
