//! Incoming generation requests.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Body of `/generate` and `/refine`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerationRequest {
    /// Free-form description of the video
    pub prompt: String,
    /// Optional visual style hint (e.g. "noir", "watercolor")
    #[serde(default)]
    pub style: Option<String>,
    /// Optional aspect ratio hint (e.g. "16:9")
    #[serde(default)]
    pub aspect: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            style: None,
            aspect: None,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_aspect(mut self, aspect: impl Into<String>) -> Self {
        self.aspect = Some(aspect.into());
        self
    }

    /// The prompt with style and aspect hints appended as labeled lines.
    pub fn combined_prompt(&self) -> String {
        combine_prompt(&self.prompt, self.style.as_deref(), self.aspect.as_deref())
    }
}

/// Join a prompt with optional `Style:` and `Aspect:` lines.
///
/// Empty hints are skipped.
pub fn combine_prompt(prompt: &str, style: Option<&str>, aspect: Option<&str>) -> String {
    let mut pieces = vec![prompt.trim().to_string()];
    if let Some(style) = style.filter(|s| !s.is_empty()) {
        pieces.push(format!("Style: {}", style));
    }
    if let Some(aspect) = aspect.filter(|s| !s.is_empty()) {
        pieces.push(format!("Aspect: {}", aspect));
    }
    pieces.join("\n")
}
