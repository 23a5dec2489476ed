/* std use */
use std::path::PathBuf;

/* project use */
use crate::index::codec;

/// Coarse classification of [Error], used by the top level handler and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Format,
    InvalidResidue,
    Integrity,
    CapacityExceeded,
    Config,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("fasta_kmer_index can't open file {path:?}: {source}")]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("fasta_kmer_index failed to read file metadata {path:?}: {source}")]
    MetaDataFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("fasta_kmer_index can't map file {path:?} on memory: {source}")]
    MapFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("fasta_kmer_index can't seek to offset {offset} in {path:?}: {source}")]
    SeekFile {
        path: PathBuf,
        offset: u64,
        source: std::io::Error,
    },

    #[error("fasta_kmer_index failed to read {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("fasta_kmer_index failed to write {path:?}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("fasta_kmer_index can't move temporary file to {path:?}: {source}")]
    PersistFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("fasta_kmer_index can't build a pool of {threads} threads: {source}")]
    ThreadPool {
        threads: usize,
        source: rayon::ThreadPoolBuildError,
    },

    #[error("{path:?} line {line}: sequence data before any header")]
    DataBeforeHeader { path: PathBuf, line: u64 },

    #[error("{path:?} line {line}: header without name")]
    EmptyName { path: PathBuf, line: u64 },

    #[error("{path:?} line {line}: record name isn't valid utf-8")]
    NameEncoding { path: PathBuf, line: u64 },

    #[error("{path:?} line {line}: record name {name:?} contains a tabulation")]
    NameWithTab {
        path: PathBuf,
        line: u64,
        name: String,
    },

    #[error("{path:?} line {line}: record name {name:?} already used by record {ordinal}")]
    DuplicateName {
        path: PathBuf,
        line: u64,
        name: String,
        ordinal: u64,
    },

    #[error("index {path:?} line {line}: {source}")]
    IndexLine {
        path: PathBuf,
        line: u64,
        source: codec::LineError,
    },

    #[error("index {path:?} line {line}: content isn't valid utf-8")]
    IndexEncoding { path: PathBuf, line: u64 },

    #[error("index {path:?} line {line}: expect ordinal {expected} found {found}")]
    IndexOrdinal {
        path: PathBuf,
        line: u64,
        expected: u64,
        found: u64,
    },

    #[error("records {first:?} and {second:?} would both be written in {path:?}")]
    PathCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("{path:?} offset {offset} isn't the begin of a header line")]
    NotAHeader { path: PathBuf, offset: u64 },

    #[error("invalid residue {residue:?} at position {position}")]
    InvalidResidue { residue: char, position: usize },

    #[error("record at offset {offset} expected {expected_name:?} of length {expected_length}, found {found_name:?} of length {found_length}")]
    Integrity {
        offset: u64,
        expected_name: String,
        expected_length: u64,
        found_name: String,
        found_length: u64,
    },

    #[error("count table reach {len} distinct kmers, only {capacity} canonical {k}-mers exist, {kmer:?} can't be canonical")]
    CapacityExceeded {
        kmer: String,
        len: u64,
        capacity: u64,
        k: usize,
    },

    #[error("count table lock was poisoned by a panicking worker")]
    PoisonedTable,

    #[error("record {name:?} at offset {offset}: {source}")]
    Record {
        name: String,
        offset: u64,
        source: Box<Error>,
    },

    #[error("kmer size must be larger than 0")]
    KmerSize,

    #[error("input {path:?} isn't a regular file")]
    NotAFile { path: PathBuf },

    #[error("unknown output format {name:?}, possibilities are fasta, list, csv")]
    UnknownFormat { name: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::OpenFile { .. }
            | Error::MetaDataFile { .. }
            | Error::MapFile { .. }
            | Error::SeekFile { .. }
            | Error::ReadFile { .. }
            | Error::WriteFile { .. }
            | Error::PersistFile { .. }
            | Error::ThreadPool { .. } => ErrorKind::Io,

            Error::DataBeforeHeader { .. }
            | Error::EmptyName { .. }
            | Error::NameEncoding { .. }
            | Error::NameWithTab { .. }
            | Error::DuplicateName { .. }
            | Error::IndexLine { .. }
            | Error::IndexEncoding { .. }
            | Error::IndexOrdinal { .. }
            | Error::PathCollision { .. }
            | Error::NotAHeader { .. } => ErrorKind::Format,

            Error::InvalidResidue { .. } => ErrorKind::InvalidResidue,

            Error::Integrity { .. } | Error::PoisonedTable => ErrorKind::Integrity,

            Error::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,

            Error::Record { source, .. } => source.kind(),

            Error::KmerSize | Error::NotAFile { .. } | Error::UnknownFormat { .. } => {
                ErrorKind::Config
            }
        }
    }

    /// Attach the record in which error occur, error already attached are left untouched
    pub fn in_record(self, name: &str, offset: u64) -> Self {
        match self {
            Error::Record { .. } => self,
            source => Error::Record {
                name: name.to_string(),
                offset,
                source: Box::new(source),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follow_record_context() {
        let error = Error::InvalidResidue {
            residue: 'R',
            position: 12,
        }
        .in_record("chr1", 42);

        assert_eq!(error.kind(), ErrorKind::InvalidResidue);
        assert_eq!(
            error.to_string(),
            "record \"chr1\" at offset 42: invalid residue 'R' at position 12"
        );

        let twice = error.in_record("chr2", 0);
        assert!(matches!(twice, Error::Record { ref name, .. } if name == "chr1"));
    }

    #[test]
    fn display() {
        let error = Error::Integrity {
            offset: 13,
            expected_name: "s2".to_string(),
            expected_length: 8,
            found_name: "s2".to_string(),
            found_length: 7,
        };

        assert_eq!(error.kind(), ErrorKind::Integrity);
        assert_eq!(
            error.to_string(),
            "record at offset 13 expected \"s2\" of length 8, found \"s2\" of length 7"
        );
    }
}
