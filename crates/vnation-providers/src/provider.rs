//! Provider seams used by the orchestrator.

use async_trait::async_trait;

use vnation_models::{GenerationResult, ProviderKind};

use crate::error::ProviderResult;

/// A text-to-video backend.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Provider tag attached to results.
    fn kind(&self) -> ProviderKind;

    /// Generate a video for `prompt`. Errors propagate to the caller so it
    /// can apply its own fallback.
    async fn generate(&self, prompt: &str, aspect: Option<&str>) -> ProviderResult<GenerationResult>;
}

/// A prompt rewriter. Implementations never fail; they degrade instead.
#[async_trait]
pub trait TextRefiner: Send + Sync {
    async fn refine(&self, prompt: &str) -> String;
}
