//! Shared data models for the VideoNation backend.
//!
//! This crate provides Serde-serializable types for:
//! - Generation requests and the combined prompt
//! - Generation results and job identifiers
//! - Account records

pub mod account;
pub mod generation;
pub mod job;
pub mod request;

// Re-export common types
pub use account::UserRecord;
pub use generation::{GenerationMeta, GenerationResult, ProviderKind};
pub use job::{JobId, JobStatus};
pub use request::{combine_prompt, GenerationRequest};
