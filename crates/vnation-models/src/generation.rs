//! Generation results returned by video providers.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{JobId, JobStatus};

/// Which backend produced a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// fal.ai text-to-video
    Fal,
    /// Canned placeholder video
    Mock,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Fal => "fal",
            ProviderKind::Mock => "mock",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request details echoed back with a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerationMeta {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<String>,
}

/// A finished video generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GenerationResult {
    pub job_id: JobId,
    pub status: JobStatus,
    pub video_url: String,
    pub provider: ProviderKind,
    pub meta: GenerationMeta,
    pub created_at: DateTime<Utc>,
}

impl GenerationResult {
    /// Create a succeeded result with a fresh job ID.
    pub fn succeeded(
        provider: ProviderKind,
        video_url: impl Into<String>,
        prompt: impl Into<String>,
        aspect: Option<String>,
    ) -> Self {
        Self {
            job_id: JobId::new(),
            status: JobStatus::Succeeded,
            video_url: video_url.into(),
            provider,
            meta: GenerationMeta {
                prompt: prompt.into(),
                aspect,
            },
            created_at: Utc::now(),
        }
    }
}
