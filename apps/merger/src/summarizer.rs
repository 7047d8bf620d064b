//! Summarizer: pluggable, trait-based capability that condenses diverging section text.
//!
//! Production backend: `BartSummarizer` (hosted `facebook/bart-large-cnn` via the
//! inference API). The pipeline only sees `&dyn Summarizer`, so tests swap in a stub.

use async_trait::async_trait;
use tracing::info;

use crate::config::Config;
use crate::llm_client::{HfInferenceClient, LlmError};

/// Condenses `text` into a summary between `min_length` and `max_length` tokens.
/// Implementations must decode deterministically.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        text: &str,
        min_length: u32,
        max_length: u32,
    ) -> Result<String, LlmError>;

    /// Short backend name for logs.
    fn backend(&self) -> &str;
}

/// Abstractive summarizer backed by a hosted seq2seq model.
pub struct BartSummarizer(pub HfInferenceClient);

#[async_trait]
impl Summarizer for BartSummarizer {
    async fn summarize(
        &self,
        text: &str,
        min_length: u32,
        max_length: u32,
    ) -> Result<String, LlmError> {
        self.0.summarize(text, min_length, max_length).await
    }

    fn backend(&self) -> &str {
        self.0.model()
    }
}

/// Builds the summarizer described by `config`.
pub fn build_summarizer(config: &Config) -> anyhow::Result<Box<dyn Summarizer>> {
    let client = HfInferenceClient::new(
        &config.hf_api_url,
        config.hf_model.clone(),
        config.hf_api_token.clone(),
    )?;
    let summarizer: Box<dyn Summarizer> = Box::new(BartSummarizer(client));

    info!("Summarizer initialized (backend: {})", summarizer.backend());
    Ok(summarizer)
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// One recorded `summarize` invocation.
    #[derive(Debug, Clone)]
    pub struct SummarizeCall {
        pub text: String,
        pub min_length: u32,
        pub max_length: u32,
    }

    /// Stub that records every call and answers with canned text, or fails on demand.
    pub struct RecordingSummarizer {
        reply: Option<String>,
        calls: Mutex<Vec<SummarizeCall>>,
    }

    impl RecordingSummarizer {
        pub fn new(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                reply: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<SummarizeCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Summarizer for RecordingSummarizer {
        async fn summarize(
            &self,
            text: &str,
            min_length: u32,
            max_length: u32,
        ) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push(SummarizeCall {
                text: text.to_string(),
                min_length,
                max_length,
            });
            self.reply.clone().ok_or(LlmError::EmptyContent)
        }

        fn backend(&self) -> &str {
            "recording"
        }
    }
}
