//! Deterministic stand-ins for the real models.
//!
//! Each word is hashed with xxHash64 into one bucket of the output vector, so
//! texts sharing words land close together. No weights, no device, same
//! output on every run.
use anyhow::{ensure, Result};
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use mmrag_core::traits::{ImageEmbedder, TextEmbedder};
use mmrag_core::types::ImageResource;

use crate::pool::l2_normalize;

fn normalized_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

fn hashed_bag_of_words(text: &str, dim: usize, seed: u64) -> Vec<f32> {
    let mut v = vec![0f32; dim];
    for word in normalized_words(text) {
        let mut hasher = XxHash64::with_seed(seed);
        word.hash(&mut hasher);
        let h = hasher.finish();
        let idx = (h as usize) % dim;
        v[idx] += 1.0 + ((h >> 32) as u32 as f32 / u32::MAX as f32) * 0.01;
    }
    l2_normalize(&mut v);
    v
}

pub struct FakeTextEmbedder { dim: usize }

impl FakeTextEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        ensure!(dim > 0, "fake text embedder needs at least one dimension");
        Ok(Self { dim })
    }
}

impl TextEmbedder for FakeTextEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn embed_text(&self, text: &str) -> Result<Vec<f32>> { Ok(hashed_bag_of_words(text, self.dim, 0)) }
}

/// Describes an image by the words in its file name (`page1_cat.png` → "page1 cat").
pub struct FakeImageEmbedder { dim: usize }

impl FakeImageEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        ensure!(dim > 0, "fake image embedder needs at least one dimension");
        Ok(Self { dim })
    }
}

impl ImageEmbedder for FakeImageEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn embed_image(&self, image: &ImageResource) -> Result<Vec<f32>> {
        let stem = image
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| anyhow::anyhow!("image path {} has no file name", image.path.display()))?;
        Ok(hashed_bag_of_words(&stem, self.dim, 1))
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> { Ok(hashed_bag_of_words(text, self.dim, 1)) }
}
