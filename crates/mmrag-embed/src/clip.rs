//! CLIP ViT-B/32 embedder for the image space.
//!
//! Images go through the vision tower; queries go through the text tower so
//! they land in the same space as the images.
use anyhow::{anyhow, Context, Result};
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_transformers::models::clip::{ClipConfig, ClipModel};
use tokenizers::Tokenizer;

use mmrag_core::traits::ImageEmbedder;
use mmrag_core::types::ImageResource;

use crate::pool::l2_normalize;
use crate::tokenize::{tokenize_on_device, Fit};
use crate::{load_var_builder, select_device};

pub const CLIP_DIM: usize = 512;
const CONTEXT_LEN: usize = 77;

pub struct ClipEmbedder { model: ClipModel, tokenizer: Tokenizer, device: Device, image_size: usize }

impl ClipEmbedder {
    pub fn load(model_dir: &Path) -> Result<Self> {
        let device = select_device();
        tracing::info!("🔄 Loading CLIP model from {}", model_dir.display());
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let config = ClipConfig::vit_base_patch32();
        let vb = load_var_builder(model_dir, DType::F32, &device)?;
        let model = ClipModel::new(vb, &config)?;
        tracing::info!("✅ CLIP model loaded");
        Ok(Self { model, tokenizer, device, image_size: config.image_size })
    }

    /// Decode, resize to the model's square input and scale pixels to [-1, 1].
    fn pixel_values(&self, path: &Path) -> Result<Tensor> {
        let img = image::open(path).with_context(|| format!("failed to decode {}", path.display()))?;
        let size = self.image_size as u32;
        let img = img.resize_exact(size, size, image::imageops::FilterType::Triangle).to_rgb8();
        let pixels = Tensor::from_vec(img.into_raw(), (self.image_size, self.image_size, 3), &Device::Cpu)?
            .permute((2, 0, 1))?
            .to_dtype(DType::F32)?
            .affine(2. / 255., -1.)?
            .unsqueeze(0)?;
        Ok(pixels.to_device(&self.device)?)
    }

    fn to_unit_vec(&self, features: &Tensor) -> Result<Vec<f32>> {
        let mut v = features.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1::<f32>()?;
        l2_normalize(&mut v);
        Ok(v)
    }
}

impl ImageEmbedder for ClipEmbedder {
    fn dim(&self) -> usize { CLIP_DIM }

    fn embed_image(&self, image: &ImageResource) -> Result<Vec<f32>> {
        let pixels = self.pixel_values(&image.path)?;
        let features = self.model.get_image_features(&pixels)?;
        self.to_unit_vec(&features)
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let (input_ids, _mask) =
            tokenize_on_device(&self.tokenizer, text, Fit::Truncate { max_len: CONTEXT_LEN }, &self.device)?;
        let features = self.model.get_text_features(&input_ids)?;
        self.to_unit_vec(&features)
    }
}
