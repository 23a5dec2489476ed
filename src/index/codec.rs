/* project use */
use crate::index::IndexRecord;

/// Reason an index line can't be decoded
#[derive(thiserror::Error, Debug)]
pub enum LineError {
    #[error("expect 4 tab separated columns found {found}")]
    ColumnCount { found: usize },

    #[error("column {column} isn't a number: {source}")]
    Field {
        column: &'static str,
        source: std::num::ParseIntError,
    },

    #[error("record name is empty")]
    EmptyName,

    #[error("ordinal must be larger than 0")]
    ZeroOrdinal,
}

impl IndexRecord {
    /// Write record as one line, new line included
    pub fn write<W>(&self, output: &mut W) -> std::io::Result<()>
    where
        W: std::io::Write,
    {
        writeln!(
            output,
            "{}\t{}\t{}\t{}",
            self.name, self.ordinal, self.length, self.offset
        )
    }

    /// Parse one line, without its line terminator
    pub fn from_line(line: &str) -> Result<Self, LineError> {
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() != 4 {
            return Err(LineError::ColumnCount {
                found: columns.len(),
            });
        }

        if columns[0].is_empty() {
            return Err(LineError::EmptyName);
        }

        let ordinal = parse_column(columns[1], "ordinal")?;
        if ordinal == 0 {
            return Err(LineError::ZeroOrdinal);
        }

        Ok(IndexRecord {
            name: columns[0].to_string(),
            ordinal,
            length: parse_column(columns[2], "length")?,
            offset: parse_column(columns[3], "offset")?,
        })
    }
}

fn parse_column(value: &str, column: &'static str) -> Result<u64, LineError> {
    value
        .parse::<u64>()
        .map_err(|source| LineError::Field { column, source })
}
