//! mmrag-vector
//!
//! In-memory similarity search for one document session: an exact flat index
//! per modality, the registry that maps ids back to content, and the pair type
//! that keeps the two in step.

pub mod flat;
pub mod pair;
pub mod registry;

pub use flat::FlatIndex;
pub use pair::ModalityIndex;
pub use registry::ContentRegistry;

use mmrag_core::error::Result;
use mmrag_core::types::{EntryId, SearchHit};

/// Append-only k-nearest-neighbour index.
///
/// Implementations return hits ascending by squared Euclidean distance with
/// ties broken by lower id, and assign ids densely in insertion order. An
/// approximate backend may replace [`FlatIndex`] as long as it keeps that
/// ordering contract.
pub trait VectorIndex: Send + Sync {
    fn dim(&self) -> usize;
    fn len(&self) -> usize;
    /// Append `vector`, returning its id (the entry count before the add).
    fn add(&mut self, vector: &[f32]) -> Result<EntryId>;
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>>;
    fn reset(&mut self);
}
