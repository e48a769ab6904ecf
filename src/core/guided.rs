// guided.rs - Guide-seeded cluster construction

use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;

use crate::core::cluster::Cluster;
use crate::core::comparator::SequenceComparator;
use crate::core::coordinator::WorkCoordinator;
use crate::core::matrix::lengths_comparable;
use crate::data::{SequenceKey, SequenceRecord, SequenceStore};
use crate::error::{Error, Result};

/// Assigns candidate sequences directly to guide-seeded clusters, skipping
/// the all-pairs matrix. O(G·N) comparator calls instead of O(N²): the
/// scalable path for large candidate sets.
///
/// Work is partitioned by guide index through the shared claim-once
/// substrate, so each guide's cluster has a single writer at a time. The
/// append still goes through a mutex: single-writer is a property of the
/// current partitioning, and work-stealing within one guide's candidate
/// list would break it.
pub struct GuidedClusterBuilder {
    length_threshold: f64,
    coordinator: WorkCoordinator,
}

impl GuidedClusterBuilder {
    pub fn new(length_threshold: f64, coordinator: WorkCoordinator) -> Self {
        Self {
            length_threshold,
            coordinator,
        }
    }

    /// One cluster per guide, in guide order, holding the candidate keys
    /// the comparator hit against that guide. Empty clusters are valid
    /// output; downstream size filtering discards them.
    pub fn build<S, C>(
        &self,
        store: &S,
        guides: &[SequenceRecord],
        candidates: &[SequenceKey],
        comparator: &C,
    ) -> Result<Vec<Cluster>>
    where
        S: SequenceStore + ?Sized,
        C: SequenceComparator + ?Sized,
    {
        if guides.is_empty() {
            return Ok(Vec::new());
        }
        if candidates.is_empty() {
            return Err(Error::EmptyInput);
        }

        println!(
            "🧵 Spawning {} workers to assign {} candidates to {} guide clusters",
            self.coordinator.workers(),
            candidates.len(),
            guides.len()
        );

        let clusters: Vec<Mutex<Cluster>> = guides.iter().map(|_| Mutex::new(Vec::new())).collect();
        let pb = ProgressBar::new(guides.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} guides ({percent}%) ETA: {eta}")
                .unwrap()
                .progress_chars("#>-"),
        );
        let completed_guides = AtomicUsize::new(0);

        let result = self.coordinator.run(guides.len(), |g| {
            let guide = &guides[g];
            for key in candidates {
                let candidate = store.lookup(key)?;
                if !lengths_comparable(guide.len(), candidate.len(), self.length_threshold) {
                    continue;
                }
                // comparator runs outside the cluster lock
                if comparator.compare(guide, candidate)?.is_some() {
                    clusters[g].lock().push(key.clone());
                }
            }
            let done = completed_guides.fetch_add(1, Ordering::Relaxed) + 1;
            pb.set_position(done as u64);
            Ok(())
        });
        match result {
            Ok(()) => pb.finish_with_message("✅ Guided clusters complete"),
            Err(_) => pb.abandon(),
        }
        result?;

        Ok(clusters.into_iter().map(|c| c.into_inner()).collect())
    }
}
