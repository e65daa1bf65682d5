use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Finish reasons returned by generateContent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum FinishReason {
    FINISH_REASON_UNSPECIFIED,
    STOP,
    MAX_TOKENS,
    SAFETY,
    RECITATION,
    LANGUAGE,
    OTHER,
    BLOCKLIST,
    PROHIBITED_CONTENT,
    SPII,
    MALFORMED_FUNCTION_CALL,
    IMAGE_SAFETY,
    #[serde(other)]
    UNKNOWN,
}

/// Chat content payload for requests and candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Value>,
}

/// A zero budget turns off thinking on 2.5 flash models, whose thinking
/// tokens otherwise count against `maxOutputTokens`.
#[derive(Debug, Clone, Serialize)]
#[allow(non_snake_case)]
pub struct ThinkingConfig {
    pub thinkingBudget: u32,
}

#[derive(Debug, Clone, Serialize)]
#[allow(non_snake_case)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub maxOutputTokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinkingConfig: Option<ThinkingConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[allow(non_snake_case)]
pub struct GenerateContentRequest {
    pub contents: Vec<Chat>,
    pub generationConfig: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Chat>,
    #[serde(default)]
    pub finishReason: Option<FinishReason>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub modelVersion: String,
    #[serde(default)]
    pub promptFeedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct PromptFeedback {
    #[serde(default)]
    pub blockReason: Option<String>,
}

impl GenerateContentRequest {
    /// Single-turn user prompt with thinking disabled.
    pub fn prompt(text: impl Into<String>, max_output_tokens: u32) -> Self {
        Self {
            contents: vec![Chat {
                role: "user".to_string(),
                parts: vec![serde_json::json!({ "text": text.into() })],
            }],
            generationConfig: GenerationConfig {
                temperature: 1.0,
                maxOutputTokens: max_output_tokens,
                thinkingConfig: Some(ThinkingConfig { thinkingBudget: 0 }),
            },
        }
    }
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate.
    pub fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect();
        Some(text)
    }

    /// Why the response carries no usable text.
    pub fn missing_text_reason(&self) -> String {
        if let Some(reason) = self
            .promptFeedback
            .as_ref()
            .and_then(|f| f.blockReason.as_deref())
        {
            return format!("prompt blocked ({reason})");
        }
        let first = self.candidates.first();
        match first.and_then(|c| c.finishReason.as_ref()) {
            None if first.is_none() => "response carried no candidate".to_string(),
            Some(FinishReason::MAX_TOKENS) => {
                "output token limit reached before any text".to_string()
            }
            Some(reason) => format!("candidate finished with {reason:?} and no text"),
            None => "candidate carried no text".to_string(),
        }
    }
}
