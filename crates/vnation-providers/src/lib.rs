//! Generation providers for the VideoNation backend.
//!
//! This crate provides:
//! - fal.ai text-to-video generation
//! - Gemini prompt refinement with a deterministic local fallback
//! - A mock provider used when video generation is unavailable
//! - The orchestrator that applies the fallback policy

pub mod error;
pub mod fal;
pub mod mock;
pub mod orchestrator;
pub mod provider;
pub mod refine;
mod task;

pub use error::{OrchestratorError, OrchestratorResult, ProviderError, ProviderResult};
pub use fal::{FalConfig, FalVideoProvider, DEFAULT_FAL_MODEL, FAL_API_BASE_URL};
pub use mock::{MockProvider, PLACEHOLDER_VIDEO_URL};
pub use orchestrator::{GenerationOrchestrator, GenerationOutcome, RefineOutcome};
pub use provider::{TextRefiner, VideoProvider};
pub use refine::{fallback_refine, refine_locally, GeminiConfig, GeminiRefiner, ResponseShape};
