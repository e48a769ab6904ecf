// mod.rs - Sequence data module

pub mod record;
pub mod store;

pub use record::{SequenceKey, SequenceRecord};
pub use store::{load_guide_sequences, FastaStore, SequenceStore};
