//! fal.ai text-to-video provider.
//!
//! Submits a request to the fal queue API, polls its status until the
//! queue reports completion, then fetches the result and extracts the
//! generated video URL. The exchange runs on a spawned task so the calling
//! request handler is never stalled by the provider. The task is aborted
//! if the caller stops waiting for it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use vnation_models::{GenerationResult, ProviderKind};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::VideoProvider;
use crate::task::AbortOnDrop;

/// Default base URL for the fal.ai queue API.
pub const FAL_API_BASE_URL: &str = "https://queue.fal.run";

/// Default text-to-video model.
pub const DEFAULT_FAL_MODEL: &str = "fal-ai/bytedance/seedance/v1/lite/text-to-video";

/// Aspect ratio used when the request carries none.
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";

const RESOLUTION: &str = "720p";
const DURATION_SECONDS: &str = "5";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER_NAME: &str = "FAL";

/// fal.ai provider configuration.
#[derive(Debug, Clone)]
pub struct FalConfig {
    /// API credential; generation is unavailable without it
    pub api_key: Option<String>,
    /// Queue API base URL
    pub base_url: String,
    /// Model path under the base URL
    pub model: String,
    /// Delay between status polls
    pub poll_interval: Duration,
    /// Limit for the whole submit/poll/fetch exchange (unbounded when unset)
    pub generation_timeout: Option<Duration>,
    /// Timeout for each individual HTTP request
    pub request_timeout: Duration,
}

impl Default for FalConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: FAL_API_BASE_URL.to_string(),
            model: DEFAULT_FAL_MODEL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            generation_timeout: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl FalConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("FAL_KEY")
                .or_else(|_| std::env::var("FAL_API_KEY"))
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("FAL_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("FAL_MODEL").unwrap_or(defaults.model),
            poll_interval: std::env::var("FAL_POLL_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval),
            generation_timeout: std::env::var("FAL_GENERATION_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
            request_timeout: defaults.request_timeout,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Arguments for the text-to-video model.
#[derive(Debug, Clone, Serialize)]
struct TextToVideoArguments {
    prompt: String,
    aspect_ratio: String,
    resolution: &'static str,
    duration: &'static str,
}

/// Response from queue submission.
#[derive(Debug, Deserialize)]
struct QueueResponse {
    request_id: String,
    #[serde(default)]
    status_url: Option<String>,
    #[serde(default)]
    response_url: Option<String>,
}

/// Response from the status endpoint.
#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    error: Option<String>,
}

/// Model output fetched once the request completes.
#[derive(Debug, Deserialize)]
struct TextToVideoOutput {
    #[serde(default)]
    video: Option<VideoFile>,
}

#[derive(Debug, Deserialize)]
struct VideoFile {
    #[serde(default)]
    url: Option<String>,
}

/// Queue state of a submitted request.
#[derive(Debug, Clone, PartialEq)]
enum QueueStatus {
    Waiting(String),
    Completed,
    Failed(String),
}

impl StatusResponse {
    fn into_queue_status(self) -> Result<QueueStatus, FalCallError> {
        match self.status.to_uppercase().as_str() {
            "IN_QUEUE" | "PENDING" | "IN_PROGRESS" | "PROCESSING" => {
                Ok(QueueStatus::Waiting(self.status))
            }
            "COMPLETED" | "OK" => match self.error {
                Some(error) => Ok(QueueStatus::Failed(error)),
                None => Ok(QueueStatus::Completed),
            },
            "FAILED" | "ERROR" => Ok(QueueStatus::Failed(
                self.error
                    .unwrap_or_else(|| "Unknown error occurred during generation".to_string()),
            )),
            _ => Err(FalCallError::UnknownStatus(self.status)),
        }
    }
}

#[derive(Debug, Error)]
enum FalCallError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Unknown generation status: {0}")]
    UnknownStatus(String),

    #[error("FAL response missing video url")]
    MissingVideoUrl,

    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),
}

/// Owned state for one submit/poll/fetch exchange.
struct FalSession {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
    poll_interval: Duration,
}

impl FalSession {
    /// Submit, wait for completion, and return the video URL.
    async fn subscribe(&self, arguments: &TextToVideoArguments) -> Result<String, FalCallError> {
        let queued = self.submit(arguments).await?;
        info!(request_id = %queued.request_id, "fal request queued");

        let status_url = queued.status_url.clone().unwrap_or_else(|| {
            format!(
                "{}/{}/requests/{}/status",
                self.base_url, self.model, queued.request_id
            )
        });
        let response_url = queued.response_url.clone().unwrap_or_else(|| {
            format!(
                "{}/{}/requests/{}",
                self.base_url, self.model, queued.request_id
            )
        });

        loop {
            let status: StatusResponse = self.get_json(&status_url).await?;
            match status.into_queue_status()? {
                QueueStatus::Waiting(state) => {
                    debug!(request_id = %queued.request_id, state = %state, "fal request pending");
                }
                QueueStatus::Completed => break,
                QueueStatus::Failed(error) => return Err(FalCallError::GenerationFailed(error)),
            }
            tokio::time::sleep(self.poll_interval).await;
        }

        let output: TextToVideoOutput = self.get_json(&response_url).await?;
        output
            .video
            .and_then(|v| v.url)
            .filter(|url| !url.is_empty())
            .ok_or(FalCallError::MissingVideoUrl)
    }

    async fn submit(&self, arguments: &TextToVideoArguments) -> Result<QueueResponse, FalCallError> {
        let url = format!("{}/{}", self.base_url, self.model);
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Key {}", self.api_key))
            .json(arguments)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FalCallError> {
        let response = self
            .http
            .get(url)
            .header("Authorization", format!("Key {}", self.api_key))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FalCallError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FalCallError::Status { status, body });
        }
        Ok(response.json().await?)
    }
}

/// fal.ai text-to-video provider.
pub struct FalVideoProvider {
    config: FalConfig,
    http: Option<Client>,
}

impl FalVideoProvider {
    /// Create a provider. A client that fails to build leaves the
    /// provider unavailable rather than failing startup.
    pub fn new(config: FalConfig) -> Self {
        let http = match Client::builder().timeout(config.request_timeout).build() {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Failed to build fal HTTP client: {}", e);
                None
            }
        };
        Self { config, http }
    }

    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::new(FalConfig::from_env())
    }

    /// Whether a credential and client are present.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some() && self.http.is_some()
    }
}

#[async_trait]
impl VideoProvider for FalVideoProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Fal
    }

    async fn generate(&self, prompt: &str, aspect: Option<&str>) -> ProviderResult<GenerationResult> {
        let api_key = self
            .config
            .api_key
            .clone()
            .ok_or_else(|| ProviderError::unavailable("FAL_KEY not set in environment"))?;
        let http = self
            .http
            .clone()
            .ok_or_else(|| ProviderError::unavailable("fal HTTP client not available"))?;

        let aspect = aspect
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_ASPECT_RATIO)
            .to_string();
        let arguments = TextToVideoArguments {
            prompt: prompt.to_string(),
            aspect_ratio: aspect.clone(),
            resolution: RESOLUTION,
            duration: DURATION_SECONDS,
        };
        let session = FalSession {
            http,
            api_key,
            base_url: self.config.base_url.trim_end_matches('/').to_string(),
            model: self.config.model.clone(),
            poll_interval: self.config.poll_interval,
        };
        let limit = self.config.generation_timeout;

        let handle = AbortOnDrop::spawn(async move {
            match limit {
                Some(limit) => {
                    match tokio::time::timeout(limit, session.subscribe(&arguments)).await {
                        Ok(result) => result,
                        Err(_) => Err(FalCallError::Timeout(limit)),
                    }
                }
                None => session.subscribe(&arguments).await,
            }
        });

        let video_url = handle
            .await
            .map_err(|e| ProviderError::internal(format!("fal generation task failed: {}", e)))?
            .map_err(|e| ProviderError::remote(PROVIDER_NAME, e))?;

        info!("fal generation completed");
        Ok(GenerationResult::succeeded(
            ProviderKind::Fal,
            video_url,
            prompt,
            Some(aspect),
        ))
    }
}
