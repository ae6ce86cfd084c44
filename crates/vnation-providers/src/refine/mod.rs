//! Prompt refinement.
//!
//! Gemini is tried first when a credential is configured; everything else
//! degrades to the deterministic local rewrite.

mod gemini;
mod local;
mod response;

pub use gemini::{GeminiConfig, GeminiRefiner, DEFAULT_GEMINI_MODEL, GEMINI_API_BASE_URL};
pub use local::{fallback_refine, refine_locally, MAX_REFINED_WORDS};
pub use response::ResponseShape;
