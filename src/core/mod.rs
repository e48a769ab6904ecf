// mod.rs - Clustering core module

pub mod cluster;
pub mod comparator;
pub mod coordinator;
pub mod guided;
pub mod matrix;

pub use cluster::{Cluster, ClusterEngine, DEFAULT_DISTANCE_THRESHOLD};
pub use comparator::{BlastnComparator, SequenceComparator};
pub use coordinator::{ClaimSet, WorkCoordinator};
pub use guided::GuidedClusterBuilder;
pub use matrix::{DistanceMatrix, DistanceMatrixBuilder, LENGTH_GATE_FAILED, NO_HIT, UNCOMPARED};
