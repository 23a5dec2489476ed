/* std use */
use std::io::Write;

/* crate use */
use log::{debug, info};

/* project use */
use crate::atomic::AtomicFile;
use crate::error;
use crate::index::{self, header_name, IndexRecord};
use crate::reader::{self, Line, SequenceRecord};
use crate::scheduler::Scheduler;

/// How a record reach its own file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplodeMode {
    /// Lines are copied as they are read, record is never fully in memory
    PassThrough,
    /// Record is loaded, checked and written back with lines of [crate::DEFAULT_LINE_WIDTH]
    Reload,
}

impl Default for ExplodeMode {
    fn default() -> Self {
        ExplodeMode::PassThrough
    }
}

/// Path of record file: `<source>_<name>.fasta`, `/` in name is replaced by `_`
pub fn record_path<P>(source: P, name: &str) -> std::path::PathBuf
where
    P: AsRef<std::path::Path>,
{
    let mut path = source.as_ref().as_os_str().to_owned();
    path.push(format!("_{}.fasta", name.replace('/', "_")));

    std::path::PathBuf::from(path)
}

/// Write each record of source in its own file, return paths in index order
pub fn explode<P>(
    source: P,
    scheduler: &Scheduler,
    mode: ExplodeMode,
) -> error::Result<Vec<std::path::PathBuf>>
where
    P: AsRef<std::path::Path>,
{
    let source = source.as_ref();
    let index = index::ensure(source)?;

    check_paths(source, &index)?;

    info!(
        "Explode {} records of {} with {} threads",
        index.len(),
        source.display(),
        scheduler.threads()
    );

    scheduler.collect(&index, |record| {
        let result = match mode {
            ExplodeMode::PassThrough => pass_through(source, record),
            ExplodeMode::Reload => reload(source, record),
        };

        result.map_err(|e| e.in_record(&record.name, record.offset))
    })
}

/// Fail if two records of index would be written in the same file
pub fn check_paths(source: &std::path::Path, index: &[IndexRecord]) -> error::Result<()> {
    let mut targets: rustc_hash::FxHashMap<std::path::PathBuf, &str> =
        rustc_hash::FxHashMap::default();

    for record in index {
        let path = record_path(source, &record.name);
        if let Some(first) = targets.get(&path) {
            return Err(error::Error::PathCollision {
                path,
                first: first.to_string(),
                second: record.name.clone(),
            });
        }
        targets.insert(path, &record.name);
    }

    Ok(())
}

fn pass_through(source: &std::path::Path, record: &IndexRecord) -> error::Result<std::path::PathBuf> {
    let mut output = AtomicFile::create(record_path(source, &record.name))?;

    let mut name = None;
    let mut length = 0;
    let mut failure = None;

    reader::read_at_with(source, record.offset, |line| {
        let written = match line {
            Line::Header(header) => {
                name = Some(header_name(header).map(str::to_string));
                output.write_with(|out| {
                    out.write_all(header)?;
                    out.write_all(b"\n")
                })
            }
            Line::Residues(residues) => {
                length += residues.len() as u64;
                output.write_with(|out| {
                    out.write_all(residues)?;
                    out.write_all(b"\n")
                })
            }
        };

        match written {
            Ok(()) => true,
            Err(e) => {
                failure = Some(e);
                false
            }
        }
    })?;

    if let Some(e) = failure {
        return Err(e);
    }

    let name = name.flatten().ok_or_else(|| error::Error::NameEncoding {
        path: source.to_path_buf(),
        line: 1,
    })?;
    record.check(&name, length)?;

    let path = output.commit()?;
    debug!("record {:?} copied to {}", record.name, path.display());

    Ok(path)
}

fn reload(source: &std::path::Path, record: &IndexRecord) -> error::Result<std::path::PathBuf> {
    let sequence = reader::read_at(source, record.offset)?;
    sequence.check(record)?;

    let mut output = AtomicFile::create(record_path(source, &record.name))?;
    output.write_with(|out| sequence.write_fasta(out, crate::DEFAULT_LINE_WIDTH))?;

    let path = output.commit()?;
    debug!("record {:?} written to {}", record.name, path.display());

    Ok(path)
}

/// Read and check every record of source, records are returned in index order
pub fn load_all<P>(source: P, scheduler: &Scheduler) -> error::Result<Vec<SequenceRecord>>
where
    P: AsRef<std::path::Path>,
{
    let source = source.as_ref();
    let index = index::ensure(source)?;

    let records = scheduler.collect(&index, |record| {
        reader::read_at(source, record.offset)
            .and_then(|sequence| sequence.check(record).map(|_| sequence))
            .map_err(|e| e.in_record(&record.name, record.offset))
    })?;

    info!("{} records loaded", records.len());

    Ok(records)
}
