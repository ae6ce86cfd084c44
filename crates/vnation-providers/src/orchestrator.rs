//! Fallback policy for generation and refinement.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use vnation_models::{GenerationRequest, GenerationResult};

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::mock::MockProvider;
use crate::provider::{TextRefiner, VideoProvider};
use crate::task::AbortOnDrop;

pub const SUCCESS_MESSAGE: &str = "Video successfully generated.";

/// A generation and the message shown alongside it.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub result: GenerationResult,
    pub message: String,
}

impl GenerationOutcome {
    /// Whether the mock provider stood in for the real one.
    pub fn is_fallback(&self) -> bool {
        self.result.provider == vnation_models::ProviderKind::Mock
    }
}

/// A refined prompt next to the prompt the caller sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefineOutcome {
    pub original_prompt: String,
    pub refined_prompt: String,
}

/// Composes a video provider and a refiner with their fallback policies.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    video: Arc<dyn VideoProvider>,
    refiner: Arc<dyn TextRefiner>,
    mock: MockProvider,
}

impl GenerationOrchestrator {
    pub fn new(video: Arc<dyn VideoProvider>, refiner: Arc<dyn TextRefiner>) -> Self {
        Self {
            video,
            refiner,
            mock: MockProvider::new(),
        }
    }

    /// Generate a video, substituting the mock video on any failure.
    pub async fn generate(&self, req: &GenerationRequest) -> GenerationOutcome {
        let combined = req.combined_prompt();

        match self.video.generate(&combined, req.aspect.as_deref()).await {
            Ok(result) => {
                info!(job_id = %result.job_id, provider = %result.provider, "Video generated");
                GenerationOutcome {
                    result,
                    message: SUCCESS_MESSAGE.to_string(),
                }
            }
            Err(e) => {
                let provider = self.video.kind();
                if e.is_unavailable() {
                    info!(%provider, reason = %e, "Video provider unavailable, serving mock video");
                } else {
                    warn!(%provider, error = %e, "Video generation failed, serving mock video");
                }
                let result = self.mock.generate(&combined);
                GenerationOutcome {
                    result,
                    message: format!("API unavailable or failed ({}). Showing mock video.", e),
                }
            }
        }
    }

    /// Refine the request's combined prompt.
    ///
    /// The refiner runs on its own task; a panic there is the only failure.
    pub async fn refine(&self, req: &GenerationRequest) -> OrchestratorResult<RefineOutcome> {
        let combined = req.combined_prompt();
        let refiner = Arc::clone(&self.refiner);

        let refined_prompt = AbortOnDrop::spawn(async move { refiner.refine(&combined).await })
            .await
            .map_err(|e| OrchestratorError::RefineFailed(e.to_string()))?;

        Ok(RefineOutcome {
            original_prompt: req.prompt.clone(),
            refined_prompt,
        })
    }
}
