//! Blocking client for OpenAI-compatible chat completion endpoints (Groq by default).
use anyhow::{anyhow, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

use mmrag_core::config::GenerationSettings;
use mmrag_core::traits::{CompletionApi, CompletionError, CompletionRequest};

pub struct OpenAiCompatibleClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl OpenAiCompatibleClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url: base_url.into().trim_end_matches('/').to_string(), api_key: api_key.into(), client })
    }

    /// Reads the API key from the env var named by `api_key_env`.
    pub fn from_settings(settings: &GenerationSettings) -> Result<Self> {
        let api_key = std::env::var(&settings.api_key_env)
            .map_err(|_| anyhow!("API key missing: set {}", settings.api_key_env))?;
        Self::new(settings.base_url.clone(), api_key, Duration::from_secs(settings.timeout_secs))
    }

    fn chat_url(&self) -> String { format!("{}/chat/completions", self.base_url) }
}

/// 5xx responses are the server's problem and worth another try; anything else is not.
pub fn classify_status(status: StatusCode, body: &str) -> CompletionError {
    let message = format!("API error {}: {}", status, body);
    if status.is_server_error() { CompletionError::Transient(message) } else { CompletionError::Fatal(message) }
}

fn classify_transport(e: reqwest::Error) -> CompletionError {
    if e.is_timeout() || e.is_connect() {
        CompletionError::Transient(format!("connection failed: {e}"))
    } else {
        CompletionError::Fatal(format!("request failed: {e}"))
    }
}

impl CompletionApi for OpenAiCompatibleClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
        });
        let resp = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(classify_transport)?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(classify_status(status, &text));
        }

        let json: Value = resp.json().map_err(|e| CompletionError::Fatal(format!("invalid response body: {e}")))?;
        json["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .map(str::to_string)
            .ok_or_else(|| CompletionError::Fatal("no choices in response".into()))
    }
}
