//! One host-owned session: a single ingested document and the state to query it.
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use twox_hash::XxHash64;

use mmrag_core::config::Settings;
use mmrag_core::error::{Error, Result};
use mmrag_core::extract::DirectoryExtractor;
use mmrag_core::traits::DocumentExtractor;
use mmrag_core::types::{Answer, ExtractedDocument, Retrieval};
use mmrag_embed::load_embedders;
use mmrag_generate::ResilientGenerator;

use crate::retrieval::{IngestReport, RetrievalEngine};

/// What is currently indexed: the document's path and a hash of its extracted content.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Loaded {
    key: PathBuf,
    fingerprint: u64,
}

pub struct Session {
    extractor: Box<dyn DocumentExtractor>,
    engine: RetrievalEngine,
    generator: ResilientGenerator,
    top_k: usize,
    current: Option<Loaded>,
}

impl Session {
    pub fn new(
        extractor: Box<dyn DocumentExtractor>,
        engine: RetrievalEngine,
        generator: ResilientGenerator,
        top_k: usize,
    ) -> Result<Self> {
        if top_k == 0 {
            return Err(Error::InvalidConfiguration("top_k must be greater than zero".into()));
        }
        Ok(Self { extractor, engine, generator, top_k, current: None })
    }

    /// Directory extractor, configured embedders and the HTTP generator.
    /// Model paths resolve against `base`.
    pub fn from_settings(settings: &Settings, base: &Path) -> anyhow::Result<Self> {
        let embedders = load_embedders(&settings.embedding, base)?;
        let engine = RetrievalEngine::new(settings.chunking, embedders.text, embedders.image)?;
        let generator = ResilientGenerator::from_settings(&settings.generation)?;
        Ok(Self::new(Box::new(DirectoryExtractor::new()), engine, generator, settings.retrieval.top_k)?)
    }

    pub fn current_document(&self) -> Option<&Path> { self.current.as_ref().map(|l| l.key.as_path()) }

    pub fn engine(&self) -> &RetrievalEngine { &self.engine }

    /// Drop everything indexed so far.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.current = None;
    }

    /// Replace whatever is indexed with `document`.
    pub fn ingest(&mut self, document: &Path) -> Result<IngestReport> {
        let extracted = self.extract(document)?;
        self.load(document, &extracted)
    }

    fn extract(&mut self, document: &Path) -> Result<ExtractedDocument> {
        match self.extractor.extract(document) {
            Ok(extracted) => Ok(extracted),
            Err(e) => {
                self.reset();
                Err(Error::Extraction { path: document.to_path_buf(), reason: format!("{e:#}") })
            }
        }
    }

    fn load(&mut self, document: &Path, extracted: &ExtractedDocument) -> Result<IngestReport> {
        self.reset();
        tracing::info!("📥 Ingesting {}", document.display());
        match self.engine.ingest(extracted) {
            Ok(report) => {
                self.current = Some(Loaded { key: document_key(document), fingerprint: fingerprint(extracted) });
                Ok(report)
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    /// Documents are re-extracted on every request; the indices are rebuilt
    /// only when the path or the extracted content changed.
    fn ensure_ingested(&mut self, document: &Path) -> Result<()> {
        let extracted = self.extract(document)?;
        let wanted = Loaded { key: document_key(document), fingerprint: fingerprint(&extracted) };
        if self.current.as_ref() == Some(&wanted) {
            tracing::debug!("♻️  {} unchanged, reusing indices", document.display());
            return Ok(());
        }
        self.load(document, &extracted).map(|_| ())
    }

    pub fn retrieve(&mut self, document: &Path, query: &str) -> Result<Retrieval> {
        self.ensure_ingested(document)?;
        self.engine.query(query, self.top_k)
    }

    /// Ingest `document` unless the same content is already loaded, retrieve, then generate.
    pub fn answer_query(&mut self, document: &Path, query: &str) -> Result<Answer> {
        let retrieval = self.retrieve(document, query)?;
        let answer = self.generator.generate(query, &retrieval.text, &retrieval.image_paths)?;
        Ok(Answer { answer, relevant_text: retrieval.text, relevant_image_paths: retrieval.image_paths })
    }
}

fn document_key(document: &Path) -> PathBuf {
    document.canonicalize().unwrap_or_else(|_| document.to_path_buf())
}

/// xxHash64 over the text, each image's place in the document and, when the
/// file is readable, its bytes.
fn fingerprint(document: &ExtractedDocument) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    document.text.hash(&mut hasher);
    for image in &document.images {
        image.path.hash(&mut hasher);
        image.page.hash(&mut hasher);
        image.sequence.hash(&mut hasher);
        if let Ok(bytes) = fs::read(&image.path) {
            bytes.hash(&mut hasher);
        }
    }
    hasher.finish()
}
