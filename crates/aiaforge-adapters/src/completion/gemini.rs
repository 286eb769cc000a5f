//! Gemini `generateContent` client over a blocking HTTP connection.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument, warn};

use aiaforge_core::{
    application::{
        EnhancementError,
        ports::{ApiKey, CompletionClient},
    },
    error::{ForgeError, ForgeResult},
};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Error bodies are cut to this many characters before they are kept.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            model: DEFAULT_MODEL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GeminiConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

/// Production [`CompletionClient`]. One request per call, never retried.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> ForgeResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ForgeError::Configuration {
                message: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn classify(&self, err: reqwest::Error) -> EnhancementError {
        if err.is_timeout() {
            EnhancementError::Timeout(self.config.timeout)
        } else {
            EnhancementError::Connection(err.to_string())
        }
    }
}

impl CompletionClient for GeminiClient {
    #[instrument(skip_all, fields(model = %self.config.model))]
    fn complete(&self, key: &ApiKey, prompt: &str) -> Result<String, EnhancementError> {
        let url = self.config.generate_url();
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });
        debug!(%url, "Sending completion request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", key.expose())
            .json(&body)
            .send()
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let text = response.text().map_err(|e| self.classify(e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Completion service returned an error");
            return Err(EnhancementError::Status {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        first_candidate_text(&text)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// First non-empty `candidates[].content.parts[].text` of a response body.
fn first_candidate_text(body: &str) -> Result<String, EnhancementError> {
    let envelope: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| EnhancementError::Unparseable(format!("response envelope: {e}")))?;

    envelope
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .find(|t| !t.trim().is_empty())
        .ok_or(EnhancementError::MissingContent)
}
