/* std use */
use std::io::Write;

/* crate use */
use log::{debug, info};

/* project use */
use crate::atomic::AtomicFile;
use crate::error;
use crate::index::{header_name, sidecar_path, Index, IndexRecord};

/// Scan source, write its sidecar index and return it.
///
/// Sidecar is written under a temporary name and renamed only if scan succeed.
pub fn build<P>(path: P) -> error::Result<Index>
where
    P: AsRef<std::path::Path>,
{
    let path = path.as_ref();

    info!("Indexing {}", path.display());
    let index = scan(path)?;

    let sidecar = write(path, &index)?;
    info!("{} records indexed in {}", index.len(), sidecar.display());

    Ok(index)
}

/// Scan source and return index without write it
pub fn scan<P>(path: P) -> error::Result<Index>
where
    P: AsRef<std::path::Path>,
{
    let path = path.as_ref();

    let file = std::fs::File::open(path).map_err(|source| error::Error::OpenFile {
        path: path.to_path_buf(),
        source,
    })?;

    let file_length = file
        .metadata()
        .map_err(|source| error::Error::MetaDataFile {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    // an empty file can't be mapped
    if file_length == 0 {
        return Ok(Index::new());
    }

    let data = unsafe {
        memmap2::Mmap::map(&file).map_err(|source| error::Error::MapFile {
            path: path.to_path_buf(),
            source,
        })?
    };

    let mut scanner = Scanner::new(path);
    for (number, line) in Lines::new(&data).enumerate() {
        scanner.line(number as u64 + 1, line)?;
    }

    Ok(scanner.finish())
}

/// Write index in sidecar of source
pub fn write<P>(source: P, index: &[IndexRecord]) -> error::Result<std::path::PathBuf>
where
    P: AsRef<std::path::Path>,
{
    let mut output = AtomicFile::create(sidecar_path(source))?;

    output.write_with(|out| {
        for record in index {
            record.write(out)?;
        }
        out.flush()
    })?;

    output.commit()
}

/// Iterate over line of a buffer, line terminator isn't include
struct Lines<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Lines<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.data.len() {
            return None;
        }

        let rest = &self.data[self.position..];
        let end = memchr::memchr(b'\n', rest).unwrap_or(rest.len());
        self.position += end + 1;

        Some(&rest[..end])
    }
}

/// State of index construction
struct Scanner<'a> {
    path: &'a std::path::Path,
    offset: u64,
    records: Index,
    current: Option<IndexRecord>,
    names: rustc_hash::FxHashMap<String, u64>,
}

impl<'a> Scanner<'a> {
    fn new(path: &'a std::path::Path) -> Self {
        Self {
            path,
            offset: 0,
            records: Index::new(),
            current: None,
            names: rustc_hash::FxHashMap::default(),
        }
    }

    fn line(&mut self, number: u64, line: &[u8]) -> error::Result<()> {
        if line.first() == Some(&b'>') {
            self.flush();
            self.current = Some(self.open(number, line)?);
        } else if !line.is_empty() {
            match self.current.as_mut() {
                Some(record) => record.length += line.len() as u64,
                None => {
                    return Err(error::Error::DataBeforeHeader {
                        path: self.path.to_path_buf(),
                        line: number,
                    })
                }
            }
        }

        // one byte for '\n', '\r' stay in line
        self.offset += line.len() as u64 + 1;

        Ok(())
    }

    fn open(&mut self, number: u64, header: &[u8]) -> error::Result<IndexRecord> {
        let name = header_name(header).ok_or_else(|| error::Error::NameEncoding {
            path: self.path.to_path_buf(),
            line: number,
        })?;

        if name.is_empty() {
            return Err(error::Error::EmptyName {
                path: self.path.to_path_buf(),
                line: number,
            });
        }

        if name.contains('\t') {
            return Err(error::Error::NameWithTab {
                path: self.path.to_path_buf(),
                line: number,
                name: name.to_string(),
            });
        }

        let ordinal = self.records.len() as u64 + 1;
        if let Some(previous) = self.names.insert(name.to_string(), ordinal) {
            return Err(error::Error::DuplicateName {
                path: self.path.to_path_buf(),
                line: number,
                name: name.to_string(),
                ordinal: previous,
            });
        }

        Ok(IndexRecord {
            name: name.to_string(),
            ordinal,
            length: 0,
            offset: self.offset,
        })
    }

    fn flush(&mut self) {
        if let Some(record) = self.current.take() {
            debug!(
                "record {:?} ordinal {} length {} offset {}",
                record.name, record.ordinal, record.length, record.offset
            );
            self.records.push(record);
        }
    }

    fn finish(mut self) -> Index {
        self.flush();

        self.records
    }
}
