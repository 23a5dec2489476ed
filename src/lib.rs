//! Random access to multi-record fasta files through a sidecar index, and parallel
//! canonical kmer counting over the indexed records.
//!
//! A run go through:
//! - [index::ensure] load `<source>.idx` or build it with one scan of source
//! - [scheduler::Scheduler::run] dispatch one task per [index::IndexRecord] on a bounded pool
//! - each task [reader::read_at] its record, [kmer::for_each_canonical] and [count::CountTable::increment]
//! - [writer::save] drain the table in one of the [writer::OutputFormat]

/* mod declaration */
pub mod atomic;
pub mod count;
pub mod error;
pub mod explode;
pub mod index;
pub mod kmer;
pub mod pipeline;
pub mod reader;
pub mod scheduler;
pub mod writer;

/// Line width of fasta produced by re-emission of a record
pub const DEFAULT_LINE_WIDTH: usize = 80;

/// Number of increments between two progress messages of count table
pub const PROGRESS_STEP: u64 = 10_000_000;
