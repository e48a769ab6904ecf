// coordinator.rs - Parallel work distribution substrate

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use parking_lot::Mutex;

use crate::error::{Error, Result};

/// Concurrent claim-once set over unit indices.
///
/// A unit claimed by one worker is never handed to another: claim() is an
/// atomic check-and-insert under the lock.
#[derive(Debug, Default)]
pub struct ClaimSet {
    claimed: Mutex<HashSet<usize>>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the caller won the claim for `unit`.
    pub fn claim(&self, unit: usize) -> bool {
        self.claimed.lock().insert(unit)
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.lock().len()
    }
}

/// Fixed-size pool of OS threads sharing a ClaimSet.
///
/// Work is partitioned by unit index (a matrix row or a guide index). Each
/// worker loops over all indices, claims the unclaimed ones, and runs the
/// supplied closure on them. Workers are joined before run() returns.
///
/// The first error any worker hits raises a shared cancellation flag; the
/// surviving workers stop at their next unit boundary and that single error
/// is returned after the join.
pub struct WorkCoordinator {
    workers: usize,
}

impl WorkCoordinator {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Pool sized to the available execution units.
    pub fn with_available_workers() -> Self {
        Self::new(num_cpus::get())
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn run<F>(&self, units: usize, work: F) -> Result<()>
    where
        F: Fn(usize) -> Result<()> + Sync,
    {
        if units == 0 {
            return Ok(());
        }

        let claims = ClaimSet::new();
        let cancelled = AtomicBool::new(false);
        let failure: Mutex<Option<Error>> = Mutex::new(None);

        thread::scope(|scope| {
            for _ in 0..self.workers.min(units) {
                scope.spawn(|| {
                    for unit in 0..units {
                        if cancelled.load(Ordering::Relaxed) {
                            break;
                        }
                        if !claims.claim(unit) {
                            continue;
                        }
                        if let Err(e) = work(unit) {
                            cancelled.store(true, Ordering::Relaxed);
                            let mut slot = failure.lock();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            break;
                        }
                    }
                });
            }
        });

        match failure.into_inner() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
