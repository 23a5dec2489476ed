//! Canonical kmer extraction.
//!
//! A canonical kmer is the lexicographically smaller of a window and its reverse
//! complement, so a sequence and its reverse strand produce the same kmers. Windows
//! that contain a residue other than `A`, `C`, `G` or `T` are skipped. Engine works
//! on upper case residues, run [normalize] first on data that may contain lower case.

/* project use */
use crate::error;

/// Multiset of canonical kmer
pub type Kmers = rustc_hash::FxHashMap<Vec<u8>, u64>;

/// Upper case residues in place, only `ACGTN` in any case are accepted
pub fn normalize(residues: &mut [u8]) -> error::Result<()> {
    for (position, residue) in residues.iter_mut().enumerate() {
        match *residue {
            b'A' | b'C' | b'G' | b'T' | b'N' => (),
            b'a' | b'c' | b'g' | b't' | b'n' => residue.make_ascii_uppercase(),
            _ => {
                return Err(error::Error::InvalidResidue {
                    residue: *residue as char,
                    position,
                })
            }
        }
    }

    Ok(())
}

/// Base pairing partner of an upper case residue, `N` is its own partner
pub fn complement(residue: u8) -> Option<u8> {
    match residue {
        b'A' => Some(b'T'),
        b'C' => Some(b'G'),
        b'G' => Some(b'C'),
        b'T' => Some(b'A'),
        b'N' => Some(b'N'),
        _ => None,
    }
}

/// Reverse complement of residues, lower case residues are rejected
pub fn reverse_complement(residues: &[u8]) -> error::Result<Vec<u8>> {
    residues
        .iter()
        .enumerate()
        .rev()
        .map(|(position, &residue)| {
            complement(residue).ok_or(error::Error::InvalidResidue {
                residue: residue as char,
                position,
            })
        })
        .collect()
}

#[inline(always)]
fn is_acgt(residue: u8) -> bool {
    matches!(residue, b'A' | b'C' | b'G' | b'T')
}

/// Call sink on canonical kmer of each window of length k without ambiguous residue.
///
/// Nothing is done if residues is shorter than k. Sink error stop extraction.
pub fn for_each_canonical<F>(residues: &[u8], k: usize, mut sink: F) -> error::Result<()>
where
    F: FnMut(&[u8]) -> error::Result<()>,
{
    if k == 0 || residues.len() < k {
        return Ok(());
    }

    let reverse = reverse_complement(residues)?;
    let length = residues.len();

    // windows starting before skip_until contain an ambiguous residue
    let mut skip_until = 0;
    let mut clean = false;

    for start in 0..=(length - k) {
        let end = start + k;
        let forward = &residues[start..end];

        if start < skip_until {
            continue;
        }

        if clean {
            if !is_acgt(forward[k - 1]) {
                clean = false;
                skip_until = end;
                continue;
            }
        } else if let Some(last) = forward.iter().rposition(|&r| !is_acgt(r)) {
            skip_until = start + last + 1;
            continue;
        } else {
            clean = true;
        }

        let reverse_start = length - end;
        let backward = &reverse[reverse_start..reverse_start + k];

        if forward <= backward {
            sink(forward)?;
        } else {
            sink(backward)?;
        }
    }

    Ok(())
}

/// Count canonical kmer of residues
pub fn extract(residues: &[u8], k: usize) -> error::Result<Kmers> {
    let mut kmers = Kmers::default();

    for_each_canonical(residues, k, |kmer| {
        match kmers.get_mut(kmer) {
            Some(count) => *count += 1,
            None => {
                kmers.insert(kmer.to_vec(), 1);
            }
        }
        Ok(())
    })?;

    Ok(kmers)
}

/// Canonical form of one kmer, None if kmer contains an ambiguous residue
pub fn canonical(kmer: &[u8]) -> error::Result<Option<Vec<u8>>> {
    let mut result = None;

    for_each_canonical(kmer, kmer.len(), |canonical| {
        result = Some(canonical.to_vec());
        Ok(())
    })?;

    Ok(result)
}

/// Extract canonical kmer from a record received by chunk.
///
/// The last k - 1 residues of a chunk are kept and prepended to the next one, so
/// result is the same as one extraction on the whole record.
pub struct StreamExtractor {
    k: usize,
    carry: Vec<u8>,
}

impl StreamExtractor {
    /// Create extractor for kmer of length k
    pub fn new(k: usize) -> Self {
        Self {
            k,
            carry: Vec::new(),
        }
    }

    /// Add chunk at the end of record, chunk is normalized before extraction
    pub fn feed<F>(&mut self, chunk: &[u8], sink: F) -> error::Result<()>
    where
        F: FnMut(&[u8]) -> error::Result<()>,
    {
        let previous = self.carry.len();
        self.carry.extend_from_slice(chunk);
        normalize(&mut self.carry[previous..])?;

        if self.k == 0 || self.carry.len() < self.k {
            return Ok(());
        }

        for_each_canonical(&self.carry, self.k, sink)?;

        let consumed = self.carry.len() - (self.k - 1);
        self.carry.drain(..consumed);

        Ok(())
    }

    /// Forget residues kept from previous chunk, before start a new record
    pub fn reset(&mut self) {
        self.carry.clear();
    }
}
