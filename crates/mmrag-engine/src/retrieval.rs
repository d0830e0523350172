use mmrag_core::chunker::{Chunker, ChunkingConfig};
use mmrag_core::error::{Error, Result};
use mmrag_core::traits::{ImageEmbedder, TextEmbedder};
use mmrag_core::types::{Chunk, ExtractedDocument, ImageRecord, ImageResource, Modality, Retrieval, SearchHit};
use mmrag_vector::{ContentRegistry, ModalityIndex};

pub const TEXT_NOT_FOUND: &str = "Text not found";
pub const IMAGE_NOT_FOUND: &str = "Image not found";

/// Outcome of one ingestion pass. Items in `skipped` were left out of the indices.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub text_entries: usize,
    pub image_entries: usize,
    pub skipped: Vec<Error>,
}

/// Chunks, embeds and indexes a document, then answers nearest-neighbour
/// queries against the text and image spaces separately.
pub struct RetrievalEngine {
    chunker: Chunker,
    text_embedder: Box<dyn TextEmbedder>,
    image_embedder: Box<dyn ImageEmbedder>,
    text: ModalityIndex<Chunk>,
    images: ModalityIndex<ImageRecord>,
}

impl RetrievalEngine {
    pub fn new(
        chunking: ChunkingConfig,
        text_embedder: Box<dyn TextEmbedder>,
        image_embedder: Box<dyn ImageEmbedder>,
    ) -> Result<Self> {
        let chunker = Chunker::new(chunking)?;
        let text = ModalityIndex::flat(Modality::Text, text_embedder.dim());
        let images = ModalityIndex::flat(Modality::Image, image_embedder.dim());
        Ok(Self { chunker, text_embedder, image_embedder, text, images })
    }

    pub fn text_index(&self) -> &ModalityIndex<Chunk> { &self.text }

    pub fn image_index(&self) -> &ModalityIndex<ImageRecord> { &self.images }

    pub fn reset(&mut self) {
        self.text.reset();
        self.images.reset();
    }

    /// Add a document to both indices.
    ///
    /// An item that fails to embed is skipped and reported; a vector of the
    /// wrong dimensionality aborts the pass.
    pub fn ingest(&mut self, document: &ExtractedDocument) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        self.ingest_text(&document.text, &mut report)?;
        self.ingest_images(&document.images, &mut report)?;
        tracing::info!(
            "✅ Ingested {} chunk(s) and {} image(s), skipped {}",
            report.text_entries,
            report.image_entries,
            report.skipped.len()
        );
        Ok(report)
    }

    fn ingest_text(&mut self, text: &str, report: &mut IngestReport) -> Result<()> {
        let chunks = self.chunker.chunk(text);
        tracing::info!("✂️  Split text into {} chunk(s)", chunks.len());
        for chunk in chunks {
            match self.text_embedder.embed_text(&chunk.content) {
                Ok(vector) => {
                    self.text.add(&vector, chunk)?;
                    report.text_entries += 1;
                }
                Err(e) => {
                    let err = Error::Embedding {
                        modality: Modality::Text,
                        item: format!("chunk {}", chunk.ordinal),
                        reason: format!("{e:#}"),
                    };
                    tracing::warn!("⚠️  Skipping: {}", err);
                    report.skipped.push(err);
                }
            }
        }
        Ok(())
    }

    fn ingest_images(&mut self, images: &[ImageResource], report: &mut IngestReport) -> Result<()> {
        for image in images {
            match self.image_embedder.embed_image(image) {
                Ok(vector) => {
                    let record = ImageRecord { image_id: image.sequence, path: image.path.to_string_lossy().to_string() };
                    self.images.add(&vector, record)?;
                    report.image_entries += 1;
                }
                Err(e) => {
                    let err = Error::Embedding {
                        modality: Modality::Image,
                        item: image.path.display().to_string(),
                        reason: format!("{e:#}"),
                    };
                    tracing::warn!("⚠️  Skipping: {}", err);
                    report.skipped.push(err);
                }
            }
        }
        Ok(())
    }

    /// Top `k` chunks and images for `query`, best first.
    pub fn query(&self, query: &str, k: usize) -> Result<Retrieval> {
        let text_query = self.text_embedder.embed_text(query).map_err(|e| query_failure(Modality::Text, e))?;
        let text_hits = self.text.search(&text_query, k)?;
        let image_query = self.image_embedder.embed_query(query).map_err(|e| query_failure(Modality::Image, e))?;
        let image_hits = self.images.search(&image_query, k)?;
        tracing::debug!("🔎 {} text hit(s), {} image hit(s) for {:?}", text_hits.len(), image_hits.len(), query);
        Ok(Retrieval {
            text: resolve(&text_hits, self.text.registry(), |c| c.content.clone(), TEXT_NOT_FOUND),
            image_paths: resolve(&image_hits, self.images.registry(), |r| r.path.clone(), IMAGE_NOT_FOUND),
        })
    }
}

fn query_failure(modality: Modality, e: anyhow::Error) -> Error {
    Error::Embedding { modality, item: "query".to_string(), reason: format!("{e:#}") }
}

fn resolve<C>(
    hits: &[SearchHit],
    registry: &ContentRegistry<C>,
    render: impl Fn(&C) -> String,
    placeholder: &str,
) -> Vec<String> {
    hits.iter()
        .map(|hit| match registry.get(hit.id) {
            Ok(content) => render(content),
            Err(e) => {
                tracing::warn!("⚠️  {}", e);
                placeholder.to_string()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_substitutes_placeholder_for_missing_ids() {
        let mut registry = ContentRegistry::new();
        registry.put(0, "a.png".to_string()).unwrap();
        let hits = [SearchHit { id: 0, distance: 0.0 }, SearchHit { id: 7, distance: 1.0 }];
        let resolved = resolve(&hits, &registry, |p: &String| p.clone(), IMAGE_NOT_FOUND);
        assert_eq!(resolved, vec!["a.png".to_string(), "Image not found".to_string()]);
    }
}
