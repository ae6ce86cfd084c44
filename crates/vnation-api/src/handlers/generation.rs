//! Generation, refinement and job status handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::warn;

use vnation_models::{GenerationRequest, GenerationResult, JobId};
use vnation_providers::RefineOutcome;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

#[derive(Serialize)]
pub struct GenerateResponse {
    pub video_url: String,
    pub message: String,
    pub job_id: JobId,
}

/// Generate a video. Provider failures fall back to the mock video.
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerationRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    let outcome = state.orchestrator.generate(&req).await;
    metrics::record_generation(outcome.result.provider.as_str(), outcome.is_fallback());

    if let Err(e) = state.jobs.put(&outcome.result).await {
        warn!(job_id = %outcome.result.job_id, "Failed to record job result: {}", e);
        metrics::record_job_store_error();
    }

    let result = outcome.result;
    Ok(Json(GenerateResponse {
        video_url: result.video_url,
        message: outcome.message,
        job_id: result.job_id,
    }))
}

/// Refine the combined prompt.
pub async fn refine(
    State(state): State<AppState>,
    Json(req): Json<GenerationRequest>,
) -> ApiResult<Json<RefineOutcome>> {
    match state.orchestrator.refine(&req).await {
        Ok(outcome) => {
            metrics::record_refinement("ok");
            Ok(Json(outcome))
        }
        Err(e) => {
            metrics::record_refinement("failed");
            Err(e.into())
        }
    }
}

/// Look up a recorded generation.
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<GenerationResult>> {
    let job_id = JobId::from_string(job_id);
    state
        .jobs
        .get(&job_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Job not found"))
}
