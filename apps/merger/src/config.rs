use std::path::PathBuf;

use anyhow::{bail, Result};

const DEFAULT_INPUT_DIR: &str = "resume";
const DEFAULT_OUTPUT_FILE: &str = "final_resume.docx";
const DEFAULT_HF_MODEL: &str = "facebook/bart-large-cnn";
const DEFAULT_HF_API_URL: &str = "https://api-inference.huggingface.co";

/// Application configuration loaded from environment variables.
/// Fails at startup if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
    pub hf_api_token: Option<String>,
    pub hf_model: String,
    pub hf_api_url: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. `from_env` delegates here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let hf_api_url = get("HF_API_URL")
            .unwrap_or_else(|| DEFAULT_HF_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !hf_api_url.starts_with("http://") && !hf_api_url.starts_with("https://") {
            bail!("HF_API_URL must be an http(s) URL, got '{hf_api_url}'");
        }

        Ok(Config {
            input_dir: get("MERGER_INPUT_DIR")
                .unwrap_or_else(|| DEFAULT_INPUT_DIR.to_string())
                .into(),
            output_file: get("MERGER_OUTPUT_FILE")
                .unwrap_or_else(|| DEFAULT_OUTPUT_FILE.to_string())
                .into(),
            hf_api_token: get("HF_API_TOKEN"),
            hf_model: get("HF_MODEL").unwrap_or_else(|| DEFAULT_HF_MODEL.to_string()),
            hf_api_url,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
