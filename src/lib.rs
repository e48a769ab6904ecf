// lib.rs - sumclust library root

//! # sumclust - sequence clustering for phylogenetic supermatrix construction
//!
//! Clusters biological sequences into phylogenetically informative groups by
//! pairwise similarity, as a preprocessing stage for building a multi-locus
//! supermatrix. Similarity scoring is delegated to an external oracle
//! (BLASTn by default); this crate owns the distance matrix, the
//! single-linkage merge algorithm, and the worker pool that drives both.
//!
//! ## Two clustering strategies
//!
//! - **All-pairs**: build a full symmetric distance matrix of e-values
//!   across a worker pool, then merge clusters bottom-up until the closest
//!   pair is farther apart than the threshold.
//! - **Guided**: assign every candidate directly to guide-seeded clusters,
//!   one BLAST per (guide, candidate) pair. O(G·N) instead of O(N²).
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use sumclust::prelude::*;
//!
//! let store = FastaStore::from_path(std::path::Path::new("sequences"))?;
//! let keys = store.keys();
//!
//! let coordinator = WorkCoordinator::with_available_workers();
//! let comparator = BlastnComparator::default();
//! let matrix = DistanceMatrixBuilder::new(0.5, coordinator).build(&store, &keys, &comparator)?;
//! let clusters = ClusterEngine::default().cluster(&keys, matrix)?;
//! # Ok::<(), sumclust::error::Error>(())
//! ```

pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, Config, RunSettings};
    pub use crate::core::{
        BlastnComparator, Cluster, ClusterEngine, DistanceMatrix, DistanceMatrixBuilder,
        GuidedClusterBuilder, SequenceComparator, WorkCoordinator,
    };
    pub use crate::data::{
        load_guide_sequences, FastaStore, SequenceKey, SequenceRecord, SequenceStore,
    };
    pub use crate::error::{Error, Result};
    pub use crate::output::write_cluster_files;
}

pub use crate::core::{ClusterEngine, DistanceMatrix, DistanceMatrixBuilder, GuidedClusterBuilder};
pub use crate::data::{FastaStore, SequenceKey, SequenceRecord};
pub use crate::error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
