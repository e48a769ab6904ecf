// cluster.rs - Single-linkage hierarchical clustering engine

use crate::core::matrix::DistanceMatrix;
use crate::data::SequenceKey;
use crate::error::{Error, Result};

/// An ordered list of sequence keys, unique within the list.
pub type Cluster = Vec<SequenceKey>;

/// Default merge threshold: the BLASTn e-value below which two clusters
/// are considered the same locus.
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Scanning,
    Merging(usize, usize),
    Terminated,
}

/// Consumes a distance matrix and merges singleton clusters bottom-up.
///
/// Inter-cluster distance is single linkage: the minimum distance between
/// any member pair. This tolerates chains of moderate similarity without
/// requiring every pair in a cluster to be mutually close, which suits
/// homologous loci with regionally variable divergence.
pub struct ClusterEngine {
    distance_threshold: f64,
}

impl ClusterEngine {
    pub fn new(distance_threshold: f64) -> Self {
        Self { distance_threshold }
    }

    /// Merge until the closest pair of clusters is farther apart than the
    /// threshold, or a single cluster remains. The cluster list starts as
    /// one singleton per key, in input order; at every step cluster index
    /// and matrix row/column stay in 1:1 correspondence.
    pub fn cluster(&self, keys: &[SequenceKey], mut matrix: DistanceMatrix) -> Result<Vec<Cluster>> {
        if keys.is_empty() {
            return Err(Error::EmptyInput);
        }
        debug_assert_eq!(keys.len(), matrix.len());

        let mut clusters: Vec<Cluster> = keys.iter().map(|key| vec![key.clone()]).collect();

        // Explicit loop over the three states; the merge count is bounded
        // by the cluster count, so no recursion is needed
        let mut state = State::Scanning;
        loop {
            state = match state {
                State::Scanning => match find_closest_pair(&matrix) {
                    Some((x, y, min)) if min <= self.distance_threshold => State::Merging(x, y),
                    _ => State::Terminated,
                },
                State::Merging(x, y) => {
                    let merged: Cluster = clusters.remove(y);
                    clusters[x].extend(merged);
                    matrix.merge(x, y);
                    State::Scanning
                }
                State::Terminated => break,
            };
        }

        Ok(clusters)
    }
}

impl Default for ClusterEngine {
    fn default() -> Self {
        Self::new(DEFAULT_DISTANCE_THRESHOLD)
    }
}

/// Scan all pairs (x, y), x < y, in row-major order for the minimum
/// distance. Ties go to the first pair encountered. A distance of exactly
/// zero short-circuits the scan: no pair can be closer.
fn find_closest_pair(matrix: &DistanceMatrix) -> Option<(usize, usize, f64)> {
    let n = matrix.len();
    if n < 2 {
        return None;
    }

    let mut best: Option<(usize, usize, f64)> = None;
    'scan: for x in 0..n {
        for y in (x + 1)..n {
            let distance = matrix.get(x, y);
            if best.map_or(true, |(_, _, min)| distance < min) {
                best = Some((x, y, distance));
                if distance == 0.0 {
                    break 'scan;
                }
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matrix::{LENGTH_GATE_FAILED, NO_HIT};

    fn keys(ids: &[&str]) -> Vec<SequenceKey> {
        ids.iter().map(|id| SequenceKey::from(*id)).collect()
    }

    fn ids(cluster: &Cluster) -> Vec<&str> {
        cluster.iter().map(|key| key.as_str()).collect()
    }

    fn symmetric(mut rows: Vec<Vec<f64>>) -> DistanceMatrix {
        let n = rows.len();
        for i in 0..n {
            rows[i][i] = 0.0;
            for j in (i + 1)..n {
                rows[j][i] = rows[i][j];
            }
        }
        DistanceMatrix::from_rows(rows)
    }

    #[test]
    fn test_concrete_five_sequence_scenario() {
        // AB = 0.0, AC = 1e-12, AD gated, AE no hit, BC = 1e-8, rest no hit
        let matrix = symmetric(vec![
            vec![0.0, 0.0, 1e-12, LENGTH_GATE_FAILED, NO_HIT],
            vec![0.0, 0.0, 1e-8, NO_HIT, NO_HIT],
            vec![0.0, 0.0, 0.0, NO_HIT, NO_HIT],
            vec![0.0, 0.0, 0.0, 0.0, NO_HIT],
            vec![0.0, 0.0, 0.0, 0.0, 0.0],
        ]);

        let engine = ClusterEngine::new(1e-10);
        let clusters = engine
            .cluster(&keys(&["A", "B", "C", "D", "E"]), matrix)
            .unwrap();

        // C joins through the min-updated A row even though BC > threshold
        assert_eq!(clusters.len(), 3);
        assert_eq!(ids(&clusters[0]), vec!["A", "B", "C"]);
        assert_eq!(ids(&clusters[1]), vec!["D"]);
        assert_eq!(ids(&clusters[2]), vec!["E"]);
    }

    #[test]
    fn test_terminates_when_min_exceeds_threshold() {
        let matrix = symmetric(vec![
            vec![0.0, 1e-8, NO_HIT],
            vec![0.0, 0.0, NO_HIT],
            vec![0.0, 0.0, 0.0],
        ]);
        let clusters = ClusterEngine::new(1e-10)
            .cluster(&keys(&["A", "B", "C"]), matrix)
            .unwrap();
        assert_eq!(clusters.len(), 3);
    }

    #[test]
    fn test_distance_equal_to_threshold_merges() {
        let matrix = symmetric(vec![vec![0.0, 1e-10], vec![0.0, 0.0]]);
        let clusters = ClusterEngine::new(1e-10)
            .cluster(&keys(&["A", "B"]), matrix)
            .unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(ids(&clusters[0]), vec!["A", "B"]);
    }

    #[test]
    fn test_single_sequence_is_terminal() {
        let matrix = symmetric(vec![vec![0.0]]);
        let clusters = ClusterEngine::default()
            .cluster(&keys(&["A"]), matrix)
            .unwrap();
        assert_eq!(clusters, vec![vec![SequenceKey::from("A")]]);
    }

    #[test]
    fn test_empty_input_rejected() {
        let matrix = DistanceMatrix::from_rows(vec![]);
        assert!(matches!(
            ClusterEngine::default().cluster(&[], matrix),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_tie_break_is_scan_order() {
        // AB and AC tie at 1e-12; (0, 1) is scanned first, so B is
        // appended before C
        let matrix = symmetric(vec![
            vec![0.0, 1e-12, 1e-12],
            vec![0.0, 0.0, NO_HIT],
            vec![0.0, 0.0, 0.0],
        ]);
        let clusters = ClusterEngine::new(1e-10)
            .cluster(&keys(&["A", "B", "C"]), matrix)
            .unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(ids(&clusters[0]), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_merged_row_is_single_linkage_minimum() {
        let mut matrix = symmetric(vec![
            vec![0.0, 1e-12, 4.0, 7.0],
            vec![0.0, 0.0, 3.0, 9.0],
            vec![0.0, 0.0, 0.0, NO_HIT],
            vec![0.0, 0.0, 0.0, 0.0],
        ]);
        let before_x: Vec<f64> = (0..4).map(|k| matrix.get(0, k)).collect();
        let before_y: Vec<f64> = (0..4).map(|k| matrix.get(1, k)).collect();

        matrix.merge(0, 1);

        // Remaining indices 2, 3 slid to 1, 2 after the shrink
        for (new_k, old_k) in [(1usize, 2usize), (2, 3)] {
            assert!(matrix.get(0, new_k) <= before_x[old_k]);
            assert!(matrix.get(0, new_k) <= before_y[old_k]);
            assert_eq!(matrix.get(0, new_k), before_x[old_k].min(before_y[old_k]));
        }
    }

    #[test]
    fn test_zero_distance_scan_short_circuits_to_first_zero() {
        // (0, 2) is zero; scan must pick it even though (1, 2) is also zero
        let matrix = symmetric(vec![
            vec![0.0, 5.0, 0.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ]);
        let (x, y, min) = find_closest_pair(&matrix).unwrap();
        assert_eq!((x, y), (0, 2));
        assert_eq!(min, 0.0);
    }
}
