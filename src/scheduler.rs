//! Run one task per job on a bounded pool of threads.
//!
//! Jobs are read in parallel, at most `threads` tasks are active at the same time.
//! [Scheduler::run] return when every started task is finished. The first error
//! stop dispatch of remaining jobs and is returned, no partial result survive it.

/* crate use */
use log::{debug, warn};
use rayon::iter::IntoParallelRefIterator;
use rayon::iter::ParallelIterator;

/* project use */
use crate::error;

/// Bounded pool of worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    threads: usize,
}

impl Scheduler {
    /// Build a scheduler with threads workers, 0 use all available cpus.
    ///
    /// More threads than cpus is accepted with a warning.
    pub fn new(threads: usize) -> Self {
        let available = num_cpus::get();

        let threads = if threads == 0 {
            available
        } else {
            if threads > available {
                warn!(
                    "Number of threads ({}) greater than number of CPUs ({}), expect slow downs",
                    threads, available
                );
            }
            threads
        };

        Self { threads }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    fn pool(&self) -> error::Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("kmer-worker-{}", i))
            .build()
            .map_err(|source| error::Error::ThreadPool {
                threads: self.threads,
                source,
            })
    }

    /// Run task on each job, block until all tasks are done
    pub fn run<T, F>(&self, jobs: &[T], task: F) -> error::Result<()>
    where
        T: Sync,
        F: Fn(&T) -> error::Result<()> + Sync + Send,
    {
        debug!("Dispatch {} jobs on {} threads", jobs.len(), self.threads);

        self.pool()?
            .install(|| jobs.par_iter().try_for_each(|job| task(job)))
    }

    /// Run task on each job, results are returned in jobs order
    pub fn collect<T, R, F>(&self, jobs: &[T], task: F) -> error::Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> error::Result<R> + Sync + Send,
    {
        debug!("Dispatch {} jobs on {} threads", jobs.len(), self.threads);

        self.pool()?
            .install(|| jobs.par_iter().map(|job| task(job)).collect())
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    #[test]
    fn auto_threads() {
        assert_eq!(Scheduler::new(0).threads(), num_cpus::get());
        assert_eq!(Scheduler::default().threads(), num_cpus::get());
        assert_eq!(Scheduler::new(3).threads(), 3);
        assert_eq!(
            Scheduler::new(num_cpus::get() + 4).threads(),
            num_cpus::get() + 4
        );
    }

    #[test]
    fn every_job_run() {
        let jobs = (1..=1_000).collect::<Vec<u64>>();
        let sum = AtomicU64::new(0);

        Scheduler::new(4)
            .run(&jobs, |job| {
                sum.fetch_add(*job, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();

        assert_eq!(sum.into_inner(), 500_500);
    }

    #[test]
    fn bounded() {
        let jobs = (0..64).collect::<Vec<u64>>();
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        Scheduler::new(2)
            .run(&jobs, |_| {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(std::time::Duration::from_millis(1));
                active.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();

        assert!(peak.into_inner() <= 2);
    }

    #[test]
    fn first_error_abort() {
        let jobs = (0..100).collect::<Vec<u64>>();

        let err = Scheduler::new(4)
            .run(&jobs, |job| {
                if *job == 42 {
                    Err(error::Error::KmerSize)
                } else {
                    Ok(())
                }
            })
            .unwrap_err();

        assert!(matches!(err, error::Error::KmerSize));
    }

    #[test]
    fn collect_keep_order() {
        let jobs = (0..100).collect::<Vec<u64>>();

        let squares = Scheduler::new(4).collect(&jobs, |job| Ok(job * job)).unwrap();

        assert_eq!(squares, jobs.iter().map(|j| j * j).collect::<Vec<u64>>());
    }
}
