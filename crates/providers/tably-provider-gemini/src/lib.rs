//! Google Gemini integration for Tably

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tably_core::{Gateway, Result, TablyError};

/// Default Gemini REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Shared HTTP client for connection pooling
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or initialize the shared HTTP client
fn get_http_client() -> Client {
    HTTP_CLIENT
        .get_or_init(|| {
            Client::builder()
                .pool_max_idle_per_host(50)
                .pool_idle_timeout(std::time::Duration::from_secs(300))
                .tcp_keepalive(std::time::Duration::from_secs(60))
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to create HTTP client")
        })
        .clone()
}

/// Connection settings for the Gemini API
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; blank or missing keys fail configuration
    pub api_key: String,
    /// Model identifier, e.g. `gemini-pro`
    pub model: String,
    /// REST endpoint base
    pub base_url: String,
}

impl GeminiConfig {
    /// Build a config with the default endpoint and model
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: tably_core::DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read `GEMINI_API_KEY` / `GEMINI_MODEL` from the environment
    pub fn from_env() -> Result<Self> {
        let api_key = tably_core::get_required_env(tably_core::API_KEY_VAR)
            .map_err(|e| TablyError::gateway_config(e.to_string()))?;
        let mut config = Self::new(api_key);
        config.model = tably_core::get_env_or(tably_core::MODEL_VAR, tably_core::DEFAULT_MODEL);
        Ok(config)
    }

    /// Override the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The key never appears in debug output
        f.debug_struct("GeminiConfig")
            .field("api_key", &"REDACTED")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Gemini API client
#[derive(Debug)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Validate the config and create a client with the shared connection
    /// pool. A blank API key is a configuration error, reported once here
    /// rather than on every call.
    pub fn configure(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(TablyError::gateway_config(
                "GEMINI_API_KEY is empty; set it in .env or the environment",
            ));
        }
        Ok(Self {
            client: get_http_client(),
            config,
        })
    }

    /// The configured model identifier
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            self.config.api_key
        )
    }
}

#[async_trait]
impl Gateway for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        tracing::debug!(
            "gemini request: model={}, {} prompt chars",
            self.config.model,
            prompt.len()
        );
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
                role: None,
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| TablyError::gateway(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TablyError::gateway(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| TablyError::gateway(format!("Failed to parse response: {}", e)))?;

        body.candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .ok_or_else(|| TablyError::gateway("Gemini response contained no candidates"))
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}
