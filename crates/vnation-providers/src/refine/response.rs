//! Text extraction from Gemini `generateContent` responses.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Character limit for stringified responses.
const RAW_TEXT_LIMIT: usize = 4000;

/// The place a response carried its text, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseShape {
    /// `candidates[0].content` is a plain string
    CandidateContent(String),
    /// `candidates[0].content.parts[0]` carries `text` or `content`
    CandidatePart(String),
    /// `candidates[0].text`
    CandidateText(String),
    /// `candidates[0].message`
    CandidateMessage(String),
    /// top-level `output_text` / `outputText`
    OutputText(String),
    /// nothing recognized; stringified candidate or response
    Raw(String),
}

#[derive(Debug, Default, Deserialize)]
struct CandidateView {
    #[serde(default)]
    content: Option<ContentView>,
    #[serde(default, deserialize_with = "string_only")]
    text: Option<String>,
    #[serde(default, deserialize_with = "string_only")]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentView {
    Text(String),
    Structured {
        #[serde(default)]
        parts: Option<Vec<PartView>>,
    },
    #[allow(dead_code)]
    Other(Value),
}

#[derive(Debug, Default, Deserialize)]
struct PartView {
    #[serde(default, deserialize_with = "string_only")]
    text: Option<String>,
    #[serde(default, deserialize_with = "string_only")]
    content: Option<String>,
}

/// Keep a field only when it holds a JSON string.
fn string_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

impl ResponseShape {
    /// Classify a decoded response body.
    pub fn from_body(body: &Value) -> Self {
        let output_text = body
            .get("output_text")
            .or_else(|| body.get("outputText"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let Some(raw_candidate) = body
            .get("candidates")
            .and_then(|c| c.get(0))
            .filter(|c| !c.is_null())
        else {
            return match output_text {
                Some(text) => ResponseShape::OutputText(text),
                None => ResponseShape::Raw(stringify(body)),
            };
        };
        // A malformed candidate only loses its own fields.
        let candidate = CandidateView::deserialize(raw_candidate).unwrap_or_default();

        match candidate.content {
            Some(ContentView::Text(text)) => return ResponseShape::CandidateContent(text),
            Some(ContentView::Structured { parts: Some(parts) }) => {
                if let Some(text) = parts.into_iter().next().and_then(|part| {
                    part.text.filter(|t| !t.is_empty()).or(part.content)
                }) {
                    return ResponseShape::CandidatePart(text);
                }
            }
            _ => {}
        }

        if let Some(text) = candidate.text {
            return ResponseShape::CandidateText(text);
        }
        if let Some(message) = candidate.message {
            return ResponseShape::CandidateMessage(message);
        }
        if let Some(text) = output_text {
            return ResponseShape::OutputText(text);
        }

        ResponseShape::Raw(stringify(raw_candidate))
    }

    /// The extracted text, trimmed.
    pub fn into_text(self) -> String {
        match self {
            ResponseShape::CandidateContent(text)
            | ResponseShape::CandidatePart(text)
            | ResponseShape::CandidateText(text)
            | ResponseShape::CandidateMessage(text)
            | ResponseShape::OutputText(text)
            | ResponseShape::Raw(text) => text.trim().to_string(),
        }
    }
}

fn stringify(value: &Value) -> String {
    let text: String = value.to_string().chars().take(RAW_TEXT_LIMIT).collect();
    text.trim().to_string()
}
