// matrix.rs - Symmetric distance matrix and its parallel builder

use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;

use crate::core::comparator::SequenceComparator;
use crate::core::coordinator::WorkCoordinator;
use crate::data::{SequenceKey, SequenceStore};
use crate::error::{Error, Result};

/// Sentinel for a cell no worker has touched yet. Never survives a
/// completed build.
pub const UNCOMPARED: f64 = 99.0;

/// Sequences too dissimilar in length to be worth comparing.
pub const LENGTH_GATE_FAILED: f64 = 50.0;

/// The comparator found no significant hit.
pub const NO_HIT: f64 = 10.0;

/// Square symmetric distance table indexed by current cluster position.
///
/// Distances are e-value-like: smaller = more similar. The diagonal is
/// always 0 and `get(i, j) == get(j, i)` at all times; merges shrink both
/// axes together so the index ↔ cluster correspondence is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    rows: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub(crate) fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == rows.len()));
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.rows[i][j]
    }

    /// Single-linkage merge of position `y` into position `x`: row and
    /// column `x` take the element-wise minimum of the two, then row and
    /// column `y` are removed and the matrix shrinks by one in each axis.
    pub fn merge(&mut self, x: usize, y: usize) {
        debug_assert!(x < y && y < self.len());
        for k in 0..self.len() {
            let min = self.rows[x][k].min(self.rows[y][k]);
            self.rows[x][k] = min;
            self.rows[k][x] = min;
        }
        debug_assert_eq!(self.rows[x][x], 0.0);
        self.rows.remove(y);
        for row in &mut self.rows {
            row.remove(y);
        }
    }
}

/// Build-phase view of the matrix: one lock per row so a symmetric
/// cell-pair write touches exactly two locks, taken in ascending index
/// order. Comparator calls never happen under either lock.
struct SharedMatrix {
    rows: Vec<Mutex<Vec<f64>>>,
}

impl SharedMatrix {
    fn new(n: usize) -> Self {
        Self {
            rows: (0..n).map(|_| Mutex::new(vec![UNCOMPARED; n])).collect(),
        }
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        self.rows[i].lock()[j]
    }

    /// Idempotent regardless of write order, so no pairing discipline needed.
    fn set_diagonal(&self, i: usize) {
        self.rows[i].lock()[i] = 0.0;
    }

    /// Write `value` to (i, j) and (j, i) as one atomic pair.
    fn set_pair(&self, i: usize, j: usize, value: f64) {
        debug_assert_ne!(i, j);
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let mut lo_row = self.rows[lo].lock();
        let mut hi_row = self.rows[hi].lock();
        lo_row[hi] = value;
        hi_row[lo] = value;
    }

    fn into_matrix(self) -> DistanceMatrix {
        DistanceMatrix::from_rows(self.rows.into_iter().map(|row| row.into_inner()).collect())
    }
}

/// All-pairs distance matrix builder.
///
/// Work is partitioned by matrix row across the coordinator's worker pool.
/// Cells already filled in by the symmetric write of an earlier row are
/// skipped; the window between that check and the write is a deliberate,
/// benign race — two workers may compute the same pair redundantly, but the
/// comparator is deterministic so the duplicate write is idempotent.
pub struct DistanceMatrixBuilder {
    length_threshold: f64,
    coordinator: WorkCoordinator,
}

impl DistanceMatrixBuilder {
    pub fn new(length_threshold: f64, coordinator: WorkCoordinator) -> Self {
        Self {
            length_threshold,
            coordinator,
        }
    }

    pub fn build<S, C>(
        &self,
        store: &S,
        keys: &[SequenceKey],
        comparator: &C,
    ) -> Result<DistanceMatrix>
    where
        S: SequenceStore + ?Sized,
        C: SequenceComparator + ?Sized,
    {
        if keys.is_empty() {
            return Err(Error::EmptyInput);
        }

        let n = keys.len();
        println!(
            "🧵 Spawning {} workers to compare {} sequences ({} pairs)",
            self.coordinator.workers(),
            n,
            n * (n - 1) / 2
        );

        let matrix = SharedMatrix::new(n);
        let pb = ProgressBar::new(n as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) ETA: {eta}")
                .unwrap()
                .progress_chars("#>-"),
        );
        let completed_rows = AtomicUsize::new(0);

        let result = self.coordinator.run(n, |i| {
            self.process_row(store, keys, comparator, &matrix, i)?;
            let done = completed_rows.fetch_add(1, Ordering::Relaxed) + 1;
            pb.set_position(done as u64);
            Ok(())
        });
        match result {
            Ok(()) => pb.finish_with_message("✅ Distance matrix complete"),
            Err(_) => pb.abandon(),
        }
        result?;

        Ok(matrix.into_matrix())
    }

    fn process_row<S, C>(
        &self,
        store: &S,
        keys: &[SequenceKey],
        comparator: &C,
        matrix: &SharedMatrix,
        i: usize,
    ) -> Result<()>
    where
        S: SequenceStore + ?Sized,
        C: SequenceComparator + ?Sized,
    {
        let subject = store.lookup(&keys[i])?;
        for j in 0..keys.len() {
            if i == j {
                matrix.set_diagonal(i);
                continue;
            }
            if matrix.get(i, j) != UNCOMPARED {
                continue;
            }

            let query = store.lookup(&keys[j])?;
            if !lengths_comparable(subject.len(), query.len(), self.length_threshold) {
                matrix.set_pair(i, j, LENGTH_GATE_FAILED);
                continue;
            }

            // comparator runs outside every lock
            match comparator.compare(subject, query)? {
                Some(score) => matrix.set_pair(i, j, score),
                None => matrix.set_pair(i, j, NO_HIT),
            }
        }
        Ok(())
    }
}

/// Length similarity gate: with threshold L, each length must fall within
/// [other * (1 - L), other * (1 + L)]. Checked in both orientations so the
/// verdict for a pair is independent of which sequence ended up as the
/// subject; a one-sided check would let the row-claim order decide the cell.
pub(crate) fn lengths_comparable(subject_len: usize, query_len: usize, threshold: f64) -> bool {
    let within = |a: f64, b: f64| a <= b * (1.0 + threshold) && a >= b * (1.0 - threshold);
    let subject_len = subject_len as f64;
    let query_len = query_len as f64;
    within(subject_len, query_len) && within(query_len, subject_len)
}
