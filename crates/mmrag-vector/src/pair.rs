use mmrag_core::error::{Error, Result};
use mmrag_core::types::{EntryId, Modality, SearchHit};

use crate::flat::FlatIndex;
use crate::registry::ContentRegistry;
use crate::VectorIndex;

/// One modality's vector index together with its content registry.
///
/// Entries only go in through [`ModalityIndex::add`], which writes both halves
/// or neither, so every id a search returns has registered content.
#[derive(Debug, Clone)]
pub struct ModalityIndex<C, I = FlatIndex> {
    modality: Modality,
    index: I,
    registry: ContentRegistry<C>,
}

impl<C> ModalityIndex<C, FlatIndex> {
    pub fn flat(modality: Modality, dim: usize) -> Self { Self::with_index(modality, FlatIndex::new(dim)) }
}

impl<C, I: VectorIndex> ModalityIndex<C, I> {
    pub fn with_index(modality: Modality, index: I) -> Self {
        Self { modality, index, registry: ContentRegistry::new() }
    }

    pub fn modality(&self) -> Modality { self.modality }

    pub fn dim(&self) -> usize { self.index.dim() }

    pub fn len(&self) -> usize { self.index.len() }

    pub fn is_empty(&self) -> bool { self.index.len() == 0 }

    pub fn add(&mut self, vector: &[f32], content: C) -> Result<EntryId> {
        let next = self.index.len();
        if self.registry.contains(next) {
            return Err(Error::Operation(format!("{} registry already holds id {next}", self.modality)));
        }
        let id = self.index.add(vector)?;
        self.registry.put(id, content)?;
        Ok(id)
    }

    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> { self.index.search(query, k) }

    pub fn content(&self, id: EntryId) -> Result<&C> { self.registry.get(id) }

    pub fn registry(&self) -> &ContentRegistry<C> { &self.registry }

    pub fn reset(&mut self) {
        self.index.reset();
        self.registry.clear();
        tracing::debug!("🧹 Cleared {} index", self.modality);
    }
}
