//! Hugging Face inference API client for seq2seq summarization models.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm_client::{http_client, send, LlmError};

#[derive(Debug, Serialize)]
struct SummarizationRequest<'a> {
    inputs: &'a str,
    parameters: SummarizationParameters,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct SummarizationParameters {
    min_length: u32,
    max_length: u32,
    do_sample: bool,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    /// Block until a cold model is loaded instead of failing with 503.
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
pub struct SummaryOutput {
    pub summary_text: String,
}

/// Client bound to one hosted model, e.g. `facebook/bart-large-cnn`.
#[derive(Clone)]
pub struct HfInferenceClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
    model: String,
}

impl HfInferenceClient {
    pub fn new(base_url: &str, model: String, token: Option<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client()?,
            endpoint: format!("{}/models/{}", base_url.trim_end_matches('/'), model),
            token,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Runs the summarization pipeline with greedy decoding and returns the first summary.
    pub async fn summarize(
        &self,
        text: &str,
        min_length: u32,
        max_length: u32,
    ) -> Result<String, LlmError> {
        let request_body = SummarizationRequest {
            inputs: text,
            parameters: SummarizationParameters {
                min_length,
                max_length,
                do_sample: false,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&request_body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = send(request).await?;

        let outputs: Vec<SummaryOutput> = response.json().await?;
        debug!("{} returned {} summaries", self.model, outputs.len());

        first_summary(outputs)
    }
}

fn first_summary(outputs: Vec<SummaryOutput>) -> Result<String, LlmError> {
    outputs
        .into_iter()
        .next()
        .map(|o| o.summary_text)
        .ok_or(LlmError::EmptyContent)
}
