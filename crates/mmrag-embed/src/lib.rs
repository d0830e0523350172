//! mmrag-embed
//!
//! Embedding models for the two similarity spaces: MiniLM for text (384-d)
//! and CLIP ViT-B/32 for images and image-space queries (512-d), both run
//! locally with candle. Set `APP_USE_FAKE_EMBEDDINGS=1` (or
//! `embedding.use_fake = true`) to swap in hashed bag-of-words embedders.
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;

use mmrag_core::config::{fake_embeddings_requested, resolve_with_base, EmbeddingSettings};
use mmrag_core::traits::{ImageEmbedder, TextEmbedder};

pub mod clip;
pub mod device;
pub mod fake;
pub mod pool;
pub mod text;
pub mod tokenize;

pub use clip::{ClipEmbedder, CLIP_DIM};
pub use device::select_device;
pub use fake::{FakeImageEmbedder, FakeTextEmbedder};
pub use pool::{l2_normalize, masked_mean_l2};
pub use text::{MiniLmEmbedder, MINILM_DIM};

pub struct Embedders {
    pub text: Box<dyn TextEmbedder>,
    pub image: Box<dyn ImageEmbedder>,
}

pub fn use_fake_embeddings(settings: &EmbeddingSettings) -> bool { fake_embeddings_requested(settings) }

/// Build both embedders. Model directories are resolved against `base`.
pub fn load_embedders(settings: &EmbeddingSettings, base: &Path) -> Result<Embedders> {
    if use_fake_embeddings(settings) {
        tracing::info!("🧪 Using fake embedders");
        return Ok(Embedders {
            text: Box::new(FakeTextEmbedder::new(MINILM_DIM)?),
            image: Box::new(FakeImageEmbedder::new(CLIP_DIM)?),
        });
    }
    let text_dir = resolve_model_dir(base, &settings.text_model_dir)?;
    let image_dir = resolve_model_dir(base, &settings.image_model_dir)?;
    Ok(Embedders {
        text: Box::new(MiniLmEmbedder::load(&text_dir)?),
        image: Box::new(ClipEmbedder::load(&image_dir)?),
    })
}

fn resolve_model_dir(base: &Path, configured: &str) -> Result<PathBuf> {
    let dir = resolve_with_base(base, configured);
    if dir.is_dir() { tracing::info!("📦 Using model dir: {}", dir.display()); return Ok(dir); }
    Err(anyhow!("Could not locate model directory {}", dir.display()))
}

/// Prefer `model.safetensors`, fall back to a pickled `pytorch_model.bin`.
pub(crate) fn load_var_builder(model_dir: &Path, dtype: DType, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors = model_dir.join("model.safetensors");
    let weights: HashMap<String, Tensor> = if safetensors.exists() {
        candle_core::safetensors::load(&safetensors, device)?
    } else {
        let pickle = model_dir.join("pytorch_model.bin");
        if !pickle.exists() {
            return Err(anyhow!("no model.safetensors or pytorch_model.bin in {}", model_dir.display()));
        }
        candle_core::pickle::read_all(&pickle)?
            .into_iter()
            .map(|(name, t)| Ok((name, t.to_device(device)?)))
            .collect::<Result<_>>()?
    };
    Ok(VarBuilder::from_tensors(weights, dtype, device))
}
