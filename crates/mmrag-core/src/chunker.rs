//! Overlapping word-window chunking.
//!
//! Text is split on whitespace and cut into windows of `chunk_size` words that
//! start every `chunk_size - overlap` words. The last windows may run past the
//! end of the text and come out shorter.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Chunk;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 200, overlap: 50 }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        let config = Self { chunk_size, overlap };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfiguration("chunk_size must be greater than zero".into()));
        }
        if self.chunk_size <= self.overlap {
            return Err(Error::InvalidConfiguration(format!(
                "chunk_size ({}) must be greater than overlap ({})",
                self.chunk_size, self.overlap
            )));
        }
        Ok(())
    }

    /// Words between the starts of two consecutive windows.
    pub fn step(&self) -> usize { self.chunk_size - self.overlap }
}

/// Split `text` into overlapping windows of words.
pub fn chunk(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>> {
    let config = ChunkingConfig::new(chunk_size, overlap)?;
    Ok(windows(text, &config))
}

fn windows(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < words.len() {
        let end = (start + config.chunk_size).min(words.len());
        chunks.push(words[start..end].join(" "));
        start += config.step();
    }
    chunks
}

#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig { &self.config }

    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        windows(text, &self.config)
            .into_iter()
            .enumerate()
            .map(|(ordinal, content)| Chunk { ordinal, content })
            .collect()
    }
}
