//! MiniLM (BERT) sentence embedder for the text space.
use anyhow::{anyhow, Result};
use std::path::Path;

use candle_core::{Device, Tensor};
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use tokenizers::Tokenizer;

use mmrag_core::traits::TextEmbedder;

use crate::pool::masked_mean_l2;
use crate::tokenize::{tokenize_on_device, Fit};
use crate::{load_var_builder, select_device};

pub const MINILM_DIM: usize = 384;
const MAX_LEN: usize = 256;
const PAD_ID: u32 = 0;

pub struct MiniLmEmbedder { model: BertModel, tokenizer: Tokenizer, device: Device, dim: usize }

impl MiniLmEmbedder {
    /// Load `tokenizer.json`, `config.json` and the weights from `model_dir`.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let device = select_device();
        tracing::info!("🔄 Loading MiniLM text model from {}", model_dir.display());
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let config_path = model_dir.join("config.json");
        let raw = std::fs::read_to_string(&config_path)?;
        let config: BertConfig = serde_json::from_str(&raw)?;
        let dim = serde_json::from_str::<serde_json::Value>(&raw)?["hidden_size"]
            .as_u64()
            .map(|d| d as usize)
            .unwrap_or(MINILM_DIM);
        let vb = load_var_builder(model_dir, DTYPE, &device)?;
        let model = BertModel::load(vb, &config)?;
        tracing::info!("✅ Text model loaded (dim {})", dim);
        Ok(Self { model, tokenizer, device, dim })
    }
}

impl TextEmbedder for MiniLmEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let (input_ids, attention_mask) =
            tokenize_on_device(&self.tokenizer, text, Fit::Pad { max_len: MAX_LEN, pad_id: PAD_ID }, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden: Tensor = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let v = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1::<f32>()?;
        if v.len() != self.dim { return Err(anyhow!("text model produced {} values, expected {}", v.len(), self.dim)); }
        Ok(v)
    }
}
