//! Model API clients: the single point of entry for every remote model call.
//!
//! ARCHITECTURAL RULE: no other module talks to a model endpoint directly.
//! Summarizers wrap the clients defined here.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use thiserror::Error;
use tracing::warn;

pub mod huggingface;

pub use huggingface::HfInferenceClient;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned empty content")]
    EmptyContent,
}

/// Builds the HTTP client shared by all model backends.
pub(crate) fn http_client() -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Sends `request` once. A non-success status becomes `LlmError::Api` carrying the
/// message from the error body. Failed calls are not retried.
pub(crate) async fn send(request: RequestBuilder) -> Result<Response, LlmError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("Model API returned {}: {}", status, body);
        return Err(LlmError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    Ok(response)
}

/// Pulls the human-readable message out of an error body.
/// Understands `{"error": {"message": ..}}` and `{"error": ".."}`; otherwise returns
/// the raw body.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    let error = &value["error"];
    error["message"]
        .as_str()
        .or_else(|| error.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}
