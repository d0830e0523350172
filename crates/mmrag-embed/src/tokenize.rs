use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;

/// How an encoding is fitted to the model's input length.
#[derive(Debug, Clone, Copy)]
pub enum Fit {
    /// Truncate, then pad up to `max_len` with `pad_id` (mask 0 on padding).
    Pad { max_len: usize, pad_id: u32 },
    /// Truncate only.
    Truncate { max_len: usize },
}

/// Encode `text` into `(input_ids, attention_mask)`, both shaped `[1, T]`.
pub fn tokenize_on_device(tokenizer: &Tokenizer, text: &str, fit: Fit, device: &Device) -> Result<(Tensor, Tensor)> {
    let enc = tokenizer.encode(text, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
    let mut ids = enc.get_ids().to_vec();
    let mut mask = enc.get_attention_mask().to_vec();
    let max_len = match fit { Fit::Pad { max_len, .. } | Fit::Truncate { max_len } => max_len };
    if ids.len() > max_len { ids.truncate(max_len); mask.truncate(max_len); }
    if let Fit::Pad { pad_id, .. } = fit {
        let pad = max_len - ids.len();
        ids.extend(std::iter::repeat(pad_id).take(pad));
        mask.extend(std::iter::repeat(0).take(pad));
    }
    let len = ids.len();
    let input_ids = Tensor::from_iter(ids, device)?.reshape((1, len))?;
    let attention_mask = Tensor::from_iter(mask, device)?.reshape((1, len))?;
    Ok((input_ids, attention_mask))
}
