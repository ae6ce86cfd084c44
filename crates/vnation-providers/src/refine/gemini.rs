//! Gemini-backed prompt refinement.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::local::fallback_refine;
use super::response::ResponseShape;
use crate::provider::TextRefiner;
use crate::task::AbortOnDrop;

/// Default base URL for the Gemini API.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model used for refinement.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-05-20";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Header carrying the API credential. Keeps the key out of request URLs.
const API_KEY_HEADER: &str = "x-goog-api-key";

const REFINE_INSTRUCTION: &str = "Refine the following user input into a highly descriptive, \
cinematic video generation prompt. Include subject, environment, lighting, mood, camera angles, \
camera movement, colors, and style. If the user included a 'Style:' or 'Aspect:' line in their \
input, integrate that style and aspect ratio naturally into the output. Do not explain or add \
commentary. Only output the refined prompt, and keep it under 100 words.";

/// Gemini refinement configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API credential; refinement stays local without it
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Request timeout
    pub request_timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: GEMINI_API_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl GeminiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("GOOGLE_API_KEY")
                .or_else(|_| std::env::var("GEMINI_API_KEY"))
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            request_timeout: defaults.request_timeout,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Error)]
enum GeminiCallError {
    /// Rejected by the API (4xx). Reported to the caller as text.
    #[error("{status}: {body}")]
    Client { status: StatusCode, body: String },

    #[error("Gemini API returned {status}: {body}")]
    Server { status: StatusCode, body: String },

    #[error("Gemini API request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Build the text sent to Gemini for a prompt.
pub(crate) fn build_instruction(prompt: &str) -> String {
    format!("{}\n\nUser input: {}", REFINE_INSTRUCTION, prompt)
}

async fn request_refinement(
    http: &Client,
    url: &str,
    api_key: &str,
    instruction: String,
) -> Result<String, GeminiCallError> {
    let request = GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part { text: instruction }],
        }],
    };

    let response = http
        .post(url)
        .header(API_KEY_HEADER, api_key)
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if status.is_client_error() {
        let body = response.text().await.unwrap_or_default();
        return Err(GeminiCallError::Client { status, body });
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GeminiCallError::Server { status, body });
    }

    let body: Value = response.json().await?;
    let shape = ResponseShape::from_body(&body);
    debug!(?shape, "Gemini response classified");
    Ok(shape.into_text())
}

/// Refines prompts through Gemini, degrading to local refinement.
pub struct GeminiRefiner {
    config: GeminiConfig,
    http: Option<Client>,
}

impl GeminiRefiner {
    pub fn new(config: GeminiConfig) -> Self {
        let http = match Client::builder().timeout(config.request_timeout).build() {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Failed to build Gemini HTTP client: {}", e);
                None
            }
        };
        Self { config, http }
    }

    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::new(GeminiConfig::from_env())
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some() && self.http.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextRefiner for GeminiRefiner {
    async fn refine(&self, prompt: &str) -> String {
        let (Some(api_key), Some(http)) = (self.config.api_key.clone(), self.http.clone()) else {
            info!("Gemini not configured, using local refinement");
            return fallback_refine(prompt);
        };

        let url = self.endpoint();
        let instruction = build_instruction(prompt);
        let handle = AbortOnDrop::spawn(async move {
            request_refinement(&http, &url, &api_key, instruction).await
        });

        match handle.await {
            Ok(Ok(text)) => text,
            Ok(Err(e @ GeminiCallError::Client { .. })) => {
                error!(error = %e, "Gemini client error during refine");
                format!("API Error: {}", e)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Gemini refine failed, falling back to local refinement");
                fallback_refine(prompt)
            }
            Err(e) => {
                warn!(error = %e, "Gemini refine task failed, falling back to local refinement");
                fallback_refine(prompt)
            }
        }
    }
}
