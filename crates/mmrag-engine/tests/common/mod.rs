#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use mmrag_core::traits::{CompletionApi, CompletionError, CompletionRequest, DocumentExtractor, ImageEmbedder, TextEmbedder};
use mmrag_core::types::{ExtractedDocument, ImageResource};

pub const VOCAB: &[&str] = &["cat", "dog", "sat", "sit", "ran", "sunset", "diagram"];

/// One dimension per vocabulary word; other words are ignored.
pub fn keyword_vector(text: &str) -> Vec<f32> {
    let mut v = vec![0f32; VOCAB.len()];
    for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        if let Some(i) = VOCAB.iter().position(|k| k.eq_ignore_ascii_case(word)) { v[i] += 1.0; }
    }
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 { for x in &mut v { *x /= norm; } }
    v
}

pub struct KeywordTextEmbedder { pub fail_on: Option<&'static str> }

impl TextEmbedder for KeywordTextEmbedder {
    fn dim(&self) -> usize { VOCAB.len() }
    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(marker) = self.fail_on { if text.contains(marker) { return Err(anyhow!("model refused input")); } }
        Ok(keyword_vector(text))
    }
}

/// Keyword embedder that counts every call, queries included.
#[derive(Clone, Default)]
pub struct CountingTextEmbedder { pub calls: Arc<AtomicUsize> }

impl CountingTextEmbedder {
    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl TextEmbedder for CountingTextEmbedder {
    fn dim(&self) -> usize { VOCAB.len() }
    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(keyword_vector(text))
    }
}

/// Images are described by their file stem; paths containing "corrupt" fail to decode.
pub struct KeywordImageEmbedder;

impl ImageEmbedder for KeywordImageEmbedder {
    fn dim(&self) -> usize { VOCAB.len() }
    fn embed_image(&self, image: &ImageResource) -> Result<Vec<f32>> {
        let stem = image.path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        if stem.contains("corrupt") { return Err(anyhow!("cannot decode {}", image.path.display())); }
        Ok(keyword_vector(&stem))
    }
    fn embed_query(&self, text: &str) -> Result<Vec<f32>> { Ok(keyword_vector(text)) }
}

/// Claims one dimensionality, produces another.
pub struct MiswiredTextEmbedder;

impl TextEmbedder for MiswiredTextEmbedder {
    fn dim(&self) -> usize { 4 }
    fn embed_text(&self, _text: &str) -> Result<Vec<f32>> { Ok(vec![0.5; 5]) }
}

pub fn image(path: &str, sequence: usize) -> ImageResource {
    ImageResource { path: PathBuf::from(path), page: 0, sequence }
}

#[derive(Clone, Default)]
pub struct MapExtractor {
    pub documents: Arc<HashMap<PathBuf, ExtractedDocument>>,
    pub calls: Arc<AtomicUsize>,
}

impl MapExtractor {
    pub fn new(documents: Vec<(&str, ExtractedDocument)>) -> Self {
        let documents = documents.into_iter().map(|(p, d)| (PathBuf::from(p), d)).collect();
        Self { documents: Arc::new(documents), calls: Arc::new(AtomicUsize::new(0)) }
    }
    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl DocumentExtractor for MapExtractor {
    fn extract(&self, document: &Path) -> Result<ExtractedDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.documents.get(document).cloned().ok_or_else(|| anyhow!("cannot open {}", document.display()))
    }
}

/// Answers with a fixed string, or fails every call when `fail` is set.
#[derive(Clone, Default)]
pub struct FixedCompletion {
    pub fail: bool,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl CompletionApi for FixedCompletion {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(request.user_prompt.clone());
        if self.fail { return Err(CompletionError::Transient("500 Internal Server Error".into())); }
        Ok("The cat sat (see page1_img1.png).".to_string())
    }
}
