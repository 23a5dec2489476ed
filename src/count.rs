//! Count table shared by all workers of a run.
//!
//! Each [CountTable::increment] update the kmer count and the total under the same
//! lock, so total is always the sum of counts. Content is only readable through
//! [CountTable::snapshot], which consume the table once every worker is done.

/* crate use */
use log::info;

/* project use */
use crate::error;
use crate::kmer::Kmers;

/// Number of canonical kmer of length k.
///
/// Half of the 4^k kmers, plus half of the 4^(k/2) palindromes when k is even.
pub fn canonical_space(k: usize) -> u64 {
    if k >= 32 {
        return u64::MAX;
    }

    let all = 1_u64 << (2 * k);
    if k % 2 == 0 {
        (all + (1_u64 << k)) / 2
    } else {
        all / 2
    }
}

#[derive(Debug, Default)]
struct Inner {
    counts: Kmers,
    total: u64,
}

/// Final content of a [CountTable]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub counts: Kmers,
    pub total: u64,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Concurrent mapping canonical kmer → occurrence
#[derive(Debug)]
pub struct CountTable {
    k: usize,
    capacity: u64,
    inner: std::sync::Mutex<Inner>,
}

impl CountTable {
    /// Create an empty table for kmer of length k
    pub fn new(k: usize) -> Self {
        Self {
            k,
            capacity: canonical_space(k),
            inner: std::sync::Mutex::new(Inner::default()),
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Maximal number of distinct canonical kmer
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Add one occurrence of kmer.
    ///
    /// Fail if a new kmer would make the table larger than [canonical_space], a sign
    /// that non canonical kmer reach the table.
    pub fn increment(&self, kmer: &[u8]) -> error::Result<()> {
        let (total, unique) = {
            let mut guard = self.inner.lock().map_err(|_| error::Error::PoisonedTable)?;
            let inner = &mut *guard;

            match inner.counts.get_mut(kmer) {
                Some(count) => *count += 1,
                None => {
                    if inner.counts.len() as u64 >= self.capacity {
                        return Err(error::Error::CapacityExceeded {
                            kmer: String::from_utf8_lossy(kmer).into_owned(),
                            len: inner.counts.len() as u64 + 1,
                            capacity: self.capacity,
                            k: self.k,
                        });
                    }

                    inner.counts.insert(kmer.to_vec(), 1);
                }
            }
            inner.total += 1;

            (inner.total, inner.counts.len())
        };

        if total % crate::PROGRESS_STEP == 0 {
            info!("Total kmers: {} unique: {}", total, unique);
        }

        Ok(())
    }

    /// Current count of kmer
    pub fn get(&self, kmer: &[u8]) -> error::Result<u64> {
        let guard = self.inner.lock().map_err(|_| error::Error::PoisonedTable)?;

        Ok(guard.counts.get(kmer).copied().unwrap_or(0))
    }

    /// Number of increments done
    pub fn total(&self) -> error::Result<u64> {
        let guard = self.inner.lock().map_err(|_| error::Error::PoisonedTable)?;

        Ok(guard.total)
    }

    pub fn len(&self) -> error::Result<usize> {
        let guard = self.inner.lock().map_err(|_| error::Error::PoisonedTable)?;

        Ok(guard.counts.len())
    }

    /// Take content of table, all writers must have finished
    pub fn snapshot(self) -> error::Result<Snapshot> {
        let inner = self
            .inner
            .into_inner()
            .map_err(|_| error::Error::PoisonedTable)?;

        Ok(Snapshot {
            counts: inner.counts,
            total: inner.total,
        })
    }
}
