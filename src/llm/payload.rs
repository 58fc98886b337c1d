//! Request payloads and Gemini `generateContent` wire structures.

use serde::{Deserialize, Serialize};

use super::error::GenerationError;

/// Which generation a payload belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PromptKind {
    /// Three product recommendations.
    Recommendations,
    /// Two-product comparison table.
    Comparison,
    /// 60-day price trend outlook.
    PriceTrend,
    /// One persona per recommended product.
    Personas,
    /// Lowest current retailer prices.
    PriceTracker,
    /// Follow-up question about a product context.
    FollowUp,
}

impl PromptKind {
    /// Short label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recommendations => "recommendations",
            Self::Comparison => "comparison",
            Self::PriceTrend => "price_trend",
            Self::Personas => "personas",
            Self::PriceTracker => "price_tracker",
            Self::FollowUp => "follow_up",
        }
    }
}

/// A single generation ready to send to the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Which builder produced this request.
    pub kind: PromptKind,
    /// Instruction placed in `systemInstruction`.
    pub system_instruction: String,
    /// User prompt placed in `contents`.
    pub prompt: String,
    /// Whether to attach the Google Search grounding tool.
    pub grounding: bool,
}

impl GenerationRequest {
    /// Create a grounded request.
    #[must_use]
    pub fn grounded(
        kind: PromptKind,
        system_instruction: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            system_instruction: system_instruction.into(),
            prompt: prompt.into(),
            grounding: true,
        }
    }

    /// Convert into the upstream request body.
    #[must_use]
    pub fn to_wire(&self) -> GenerateContentRequest<'_> {
        GenerateContentRequest {
            contents: vec![Content::text(&self.prompt)],
            system_instruction: Content::text(&self.system_instruction),
            tools: if self.grounding {
                vec![Tool::google_search()]
            } else {
                Vec::new()
            },
        }
    }
}

// Gemini request structures

/// Body of `POST models/{model}:generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

impl Tool {
    const fn google_search() -> Self {
        Self {
            google_search: GoogleSearch {},
        }
    }
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

// Gemini response structures

/// Body returned by `generateContent`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Take the text of the first part of the first candidate.
    ///
    /// # Errors
    /// Returns [`GenerationError::MalformedResponse`] naming the missing piece.
    pub fn into_text(self) -> Result<String, GenerationError> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);
        let Some(candidate) = self.candidates.into_iter().next() else {
            let detail = block_reason.map_or_else(
                || "response has no candidates".to_string(),
                |reason| format!("response has no candidates (blocked: {reason})"),
            );
            return Err(GenerationError::MalformedResponse(detail));
        };

        let content = candidate.content.ok_or_else(|| {
            GenerationError::MalformedResponse("first candidate has no content".to_string())
        })?;

        content
            .parts
            .into_iter()
            .next()
            .and_then(|part| part.text)
            .ok_or_else(|| {
                GenerationError::MalformedResponse(
                    "first content part has no text".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: &serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value.clone()).unwrap()
    }

    #[test]
    fn test_wire_shape() {
        let request = GenerationRequest::grounded(PromptKind::PriceTrend, "be brief", "tvs");
        let body = serde_json::to_value(request.to_wire()).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "parts": [{ "text": "tvs" }] }],
                "systemInstruction": { "parts": [{ "text": "be brief" }] },
                "tools": [{ "google_search": {} }]
            })
        );
    }

    #[test]
    fn test_wire_without_grounding() {
        let mut request = GenerationRequest::grounded(PromptKind::FollowUp, "sys", "q");
        request.grounding = false;
        let body = serde_json::to_value(request.to_wire()).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_into_text() {
        let response = parse(&json!({
            "candidates": [
                { "content": { "parts": [{ "text": "### Pick" }, { "text": "ignored" }] } },
                { "content": { "parts": [{ "text": "second" }] } }
            ]
        }));
        assert_eq!(response.into_text().unwrap(), "### Pick");
    }

    #[test]
    fn test_into_text_no_candidates() {
        let err = parse(&json!({ "promptFeedback": { "blockReason": "SAFETY" } }))
            .into_text()
            .unwrap_err();
        assert!(err.to_string().contains("blocked: SAFETY"));

        let err = parse(&json!({})).into_text().unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn test_into_text_missing_parts() {
        let err = parse(&json!({ "candidates": [{ "finishReason": "SAFETY" }] }))
            .into_text()
            .unwrap_err();
        assert!(err.to_string().contains("no content"));

        let err = parse(&json!({ "candidates": [{ "content": { "parts": [{}] } }] }))
            .into_text()
            .unwrap_err();
        assert!(err.to_string().contains("no text"));
    }
}
