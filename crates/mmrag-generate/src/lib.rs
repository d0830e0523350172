//! mmrag-generate
//!
//! Grounded answer generation: prompt assembly, the completion API client and
//! the bounded retry loop around it.
use std::time::Duration;

use mmrag_core::config::{expand_path, GenerationSettings};
use mmrag_core::error::{Error, Result};
use mmrag_core::traits::CompletionApi;

pub mod client;
pub mod error_log;
pub mod prompt;
pub mod retry;

pub use client::OpenAiCompatibleClient;
pub use error_log::{ErrorLog, FileErrorLog, MemoryErrorLog};
pub use retry::{Backoff, FixedDelay, NoDelay, RetryPolicy};

pub struct ResilientGenerator {
    api: Box<dyn CompletionApi>,
    backoff: Box<dyn Backoff>,
    error_log: Box<dyn ErrorLog>,
    policy: RetryPolicy,
    model: String,
    max_tokens: u32,
}

impl ResilientGenerator {
    pub fn new(
        api: Box<dyn CompletionApi>,
        backoff: Box<dyn Backoff>,
        error_log: Box<dyn ErrorLog>,
        policy: RetryPolicy,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Result<Self> {
        if policy.attempts == 0 {
            return Err(Error::InvalidConfiguration("retry policy needs at least one attempt".into()));
        }
        Ok(Self { api, backoff, error_log, policy, model: model.into(), max_tokens })
    }

    /// Real client, sleeping backoff and a file error log, all from settings.
    pub fn from_settings(settings: &GenerationSettings) -> anyhow::Result<Self> {
        let api = OpenAiCompatibleClient::from_settings(settings)?;
        Ok(Self::new(
            Box::new(api),
            Box::new(FixedDelay(Duration::from_secs(settings.retry_delay_secs))),
            Box::new(FileErrorLog::new(expand_path(&settings.error_log))),
            RetryPolicy { attempts: settings.retries },
            settings.model.clone(),
            settings.max_tokens,
        )?)
    }

    pub fn policy(&self) -> RetryPolicy { self.policy }

    /// Pause the backoff will take after `attempt` fails.
    pub fn delay_after(&self, attempt: u32) -> Duration { self.backoff.delay(attempt) }

    pub fn generate(&self, query: &str, relevant_text: &[String], relevant_images: &[String]) -> Result<String> {
        let request = prompt::completion_request(query, relevant_text, relevant_images, &self.model, self.max_tokens);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.api.complete(&request) {
                Ok(answer) => {
                    if attempt > 1 { tracing::info!("✅ Completion succeeded on attempt {}", attempt); }
                    return Ok(answer);
                }
                Err(e) if e.is_transient() && attempt < self.policy.attempts => {
                    tracing::warn!("⚠️ {}. Retrying in {:?} (attempt {}/{})", e, self.delay_after(attempt), attempt, self.policy.attempts);
                    self.backoff.wait(attempt);
                }
                Err(e) => {
                    let err = Error::Generation { attempts: attempt, reason: e.to_string() };
                    self.record_failure(query, &err);
                    return Err(err);
                }
            }
        }
    }

    fn record_failure(&self, query: &str, err: &Error) {
        tracing::error!("❌ {} (model {}, query {:?})", err, self.model, query);
        let entry = format!("{err} | model={} | query={query:?}", self.model);
        if let Err(log_err) = self.error_log.record(&entry) {
            tracing::warn!("⚠️ Could not write generation error log: {}", log_err);
        }
    }
}
