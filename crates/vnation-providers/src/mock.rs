//! Always-succeeding placeholder provider.

use vnation_models::{GenerationResult, ProviderKind};

/// Video served when no real generation is possible.
pub const PLACEHOLDER_VIDEO_URL: &str = "/mockvideos/pup.mp4";

/// Returns the canned placeholder video for any prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProvider;

impl MockProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, prompt: &str) -> GenerationResult {
        GenerationResult::succeeded(ProviderKind::Mock, PLACEHOLDER_VIDEO_URL, prompt, None)
    }
}
