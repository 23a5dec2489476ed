//! Load sidecar index, build it when it's absent.
//!
//! Absence of sidecar is the only trigger of a rebuild, an index older than its
//! source is trusted as is: delete `<source>.idx` after any change of source.

/* std use */
use std::io::BufRead;

/* crate use */
use log::info;

/* project use */
use crate::error;
use crate::index::{builder, Index, IndexRecord};

/// Path of sidecar index of source: `<source>.idx`
pub fn sidecar_path<P>(source: P) -> std::path::PathBuf
where
    P: AsRef<std::path::Path>,
{
    let mut path = source.as_ref().as_os_str().to_owned();
    path.push(".idx");

    std::path::PathBuf::from(path)
}

/// Load index of source, build it before if sidecar doesn't exist
pub fn ensure<P>(source: P) -> error::Result<Index>
where
    P: AsRef<std::path::Path>,
{
    let source = source.as_ref();
    let sidecar = sidecar_path(source);

    if sidecar.is_file() {
        info!("Index {} already exists", sidecar.display());
    } else {
        info!("Index {} does not exist, creating", sidecar.display());
        builder::build(source)?;
    }

    load(source)
}

/// Load sidecar index of source, blank lines are ignored
pub fn load<P>(source: P) -> error::Result<Index>
where
    P: AsRef<std::path::Path>,
{
    let sidecar = sidecar_path(source);

    let file = std::fs::File::open(&sidecar).map_err(|source| error::Error::OpenFile {
        path: sidecar.clone(),
        source,
    })?;

    let mut index = Index::new();
    for (number, line) in std::io::BufReader::new(file).lines().enumerate() {
        let number = number as u64 + 1;
        let line = line.map_err(|source| match source.kind() {
            std::io::ErrorKind::InvalidData => error::Error::IndexEncoding {
                path: sidecar.clone(),
                line: number,
            },
            _ => error::Error::ReadFile {
                path: sidecar.clone(),
                source,
            },
        })?;

        if line.trim().is_empty() {
            continue;
        }

        let record =
            IndexRecord::from_line(&line).map_err(|source| error::Error::IndexLine {
                path: sidecar.clone(),
                line: number,
                source,
            })?;

        let expected = index.len() as u64 + 1;
        if record.ordinal != expected {
            return Err(error::Error::IndexOrdinal {
                path: sidecar,
                line: number,
                expected,
                found: record.ordinal,
            });
        }

        index.push(record);
    }

    info!("{} records read from {}", index.len(), sidecar.display());

    Ok(index)
}

/// Search record by name
pub fn find<'a>(index: &'a [IndexRecord], name: &str) -> Option<&'a IndexRecord> {
    index.iter().find(|record| record.name == name)
}
