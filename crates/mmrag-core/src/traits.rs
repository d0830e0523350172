use std::path::Path;

use thiserror::Error;

use crate::types::{ExtractedDocument, ImageResource};

pub trait TextEmbedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_text(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

/// Embeds images, and queries into the same space as the images.
pub trait ImageEmbedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_image(&self, image: &ImageResource) -> anyhow::Result<Vec<f32>>;
    fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, document: &Path) -> anyhow::Result<ExtractedDocument>;
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompletionError {
    /// Server-side failure that is safe to retry.
    #[error("transient completion error: {0}")]
    Transient(String),
    #[error("completion error: {0}")]
    Fatal(String),
}

impl CompletionError {
    pub fn is_transient(&self) -> bool { matches!(self, CompletionError::Transient(_)) }
}

pub trait CompletionApi: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
