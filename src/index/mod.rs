/* mod declaration */
pub mod builder;
pub mod codec;
pub mod store;

pub use builder::build;
pub use store::ensure;
pub use store::find;
pub use store::load;
pub use store::sidecar_path;

/* crate use */
use bstr::ByteSlice;

/* project use */
use crate::error;

/// Position and size of one record in the source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    /// Header line without `>` and surrounding whitespace
    pub name: String,
    /// Rank of record in file, first record is 1
    pub ordinal: u64,
    /// Number of residues
    pub length: u64,
    /// Byte offset of the `>` of header line
    pub offset: u64,
}

/// All records of a file in file order
pub type Index = Vec<IndexRecord>;

impl IndexRecord {
    /// Check that a record read at [IndexRecord::offset] is the one indexed
    pub fn check(&self, name: &str, length: u64) -> error::Result<()> {
        if self.name != name || self.length != length {
            Err(error::Error::Integrity {
                offset: self.offset,
                expected_name: self.name.clone(),
                expected_length: self.length,
                found_name: name.to_string(),
                found_length: length,
            })
        } else {
            Ok(())
        }
    }
}

/// Extract record name of a header line, None if name isn't utf-8
pub fn header_name(header: &[u8]) -> Option<&str> {
    header
        .strip_prefix(b">")
        .unwrap_or(header)
        .trim()
        .to_str()
        .ok()
}
