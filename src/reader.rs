/* std use */
use std::io::BufRead;
use std::io::Seek;

/* crate use */
use log::debug;

/* project use */
use crate::error;
use crate::index::{header_name, IndexRecord};

/// A record read from source, residues are concatenated without line terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub name: String,
    pub residues: Vec<u8>,
}

impl SequenceRecord {
    /// Number of residues
    pub fn len(&self) -> u64 {
        self.residues.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Check name and length against index entry
    pub fn check(&self, expected: &IndexRecord) -> error::Result<()> {
        expected.check(&self.name, self.len())
    }

    /// Write record in fasta, residues wrapped every width bytes
    pub fn write_fasta<W>(&self, output: &mut W, width: usize) -> std::io::Result<()>
    where
        W: std::io::Write,
    {
        writeln!(output, ">{}", self.name)?;

        for line in self.residues.chunks(width.max(1)) {
            output.write_all(line)?;
            output.write_all(b"\n")?;
        }

        Ok(())
    }
}

/// Line of a record pass to [read_at_with] callback, without line terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Header line, `>` included
    Header(&'a [u8]),
    /// Non empty sequence line
    Residues(&'a [u8]),
}

/// Read record with header at offset
pub fn read_at<P>(path: P, offset: u64) -> error::Result<SequenceRecord>
where
    P: AsRef<std::path::Path>,
{
    let path = path.as_ref();

    let mut header = Vec::new();
    let mut residues = Vec::new();

    read_at_with(path, offset, |line| {
        match line {
            Line::Header(line) => header.extend_from_slice(line),
            Line::Residues(line) => residues.extend_from_slice(line),
        }
        true
    })?;

    let name = header_name(&header).ok_or_else(|| error::Error::NameEncoding {
        path: path.to_path_buf(),
        line: 1,
    })?;

    debug!("record {:?} read, {} residues", name, residues.len());

    Ok(SequenceRecord {
        name: name.to_string(),
        residues,
    })
}

/// Stream record with header at offset line by line.
///
/// Header line is pass first, then each non empty sequence line. Reading stop at next
/// header, at end of file, or when on_line return false. The file is opened for
/// this call only, concurrent call never share a cursor.
pub fn read_at_with<P, F>(path: P, offset: u64, mut on_line: F) -> error::Result<()>
where
    P: AsRef<std::path::Path>,
    F: FnMut(Line) -> bool,
{
    let path = path.as_ref();

    let mut file = std::fs::File::open(path).map_err(|source| error::Error::OpenFile {
        path: path.to_path_buf(),
        source,
    })?;

    file.seek(std::io::SeekFrom::Start(offset))
        .map_err(|source| error::Error::SeekFile {
            path: path.to_path_buf(),
            offset,
            source,
        })?;

    let mut input = std::io::BufReader::new(file);
    let mut buffer = Vec::with_capacity(256);
    let mut in_record = false;

    loop {
        buffer.clear();
        let read = input
            .read_until(b'\n', &mut buffer)
            .map_err(|source| error::Error::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;

        if read == 0 {
            break;
        }

        let line = buffer.strip_suffix(b"\n").unwrap_or(&buffer);

        if line.first() == Some(&b'>') {
            if in_record {
                break;
            }

            in_record = true;
            if !on_line(Line::Header(line)) {
                break;
            }
        } else if !in_record {
            break;
        } else if !line.is_empty() && !on_line(Line::Residues(line)) {
            break;
        }
    }

    if in_record {
        Ok(())
    } else {
        Err(error::Error::NotAHeader {
            path: path.to_path_buf(),
            offset,
        })
    }
}
