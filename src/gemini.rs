use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::state::{ChatMessage, Source};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Gemini API key not configured")]
    MissingApiKey,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Gemini API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("could not decode Gemini response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One text-generation call: model, turns, guardrail prompt and grounding flag
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub turns: Vec<ChatMessage>,
    pub system_instruction: String,
    pub google_search: bool,
}

impl GenerateRequest {
    /// A multi-turn request carrying the whole conversation in order
    pub fn chat(model: &str, history: &[ChatMessage], system_instruction: String, google_search: bool) -> Self {
        Self {
            model: model.to_string(),
            turns: history.to_vec(),
            system_instruction,
            google_search,
        }
    }

    /// A single user prompt, used by the drafting and analysis tasks
    pub fn single(model: &str, prompt: String, system_instruction: String, google_search: bool) -> Self {
        Self {
            model: model.to_string(),
            turns: vec![ChatMessage::user(prompt)],
            system_instruction,
            google_search,
        }
    }

    fn to_wire(&self) -> GeminiRequest {
        GeminiRequest {
            contents: self
                .turns
                .iter()
                .map(|msg| GeminiContent {
                    role: msg.role.as_str().to_string(),
                    parts: vec![GeminiPart { text: msg.text.clone() }],
                })
                .collect(),
            system_instruction: GeminiSystemInstruction {
                parts: vec![GeminiPart { text: self.system_instruction.clone() }],
            },
            tools: self.google_search.then(|| vec![GeminiTool { google_search: GoogleSearch {} }]),
        }
    }
}

/// What came back: markdown text (if any) and deduplicated web citations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub text: Option<String>,
    pub sources: Vec<Source>,
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction")]
    system_instruction: GeminiSystemInstruction,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTool>>,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiTool {
    #[serde(rename = "googleSearch")]
    google_search: GoogleSearch,
}

#[derive(Serialize)]
struct GoogleSearch {}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(rename = "groundingMetadata", default)]
    grounding_metadata: Option<GeminiGroundingMetadata>,
}

#[derive(Deserialize, Default)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
    // Thought summaries are not part of the answer
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize, Default)]
struct GeminiGroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GeminiGroundingChunk>,
}

#[derive(Deserialize)]
struct GeminiGroundingChunk {
    #[serde(default)]
    web: Option<GeminiWebChunk>,
}

#[derive(Deserialize)]
struct GeminiWebChunk {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

fn convert_response(response: GeminiResponse) -> Generation {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Generation::default();
    };

    let text: String = candidate
        .content
        .unwrap_or_default()
        .parts
        .into_iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text)
        .collect();

    let mut sources: Vec<Source> = Vec::new();
    for chunk in candidate.grounding_metadata.unwrap_or_default().grounding_chunks {
        let Some(web) = chunk.web else { continue };
        let Some(uri) = web.uri.filter(|u| !u.is_empty()) else { continue };
        if sources.iter().any(|s| s.uri == uri) {
            continue;
        }
        sources.push(Source { title: web.title, uri });
    }

    Generation {
        text: (!text.is_empty()).then_some(text),
        sources,
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub async fn generate(&self, request: &GenerateRequest) -> Result<Generation, GeminiError> {
        if !self.has_api_key() {
            return Err(GeminiError::MissingApiKey);
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        debug!(
            target: "gemini::generate",
            model = %request.model,
            turns = request.turns.len(),
            google_search = request.google_search,
            "sending request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request.to_wire())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(target: "gemini::generate", "Status: {}, Body: {}", status, body);
            return Err(GeminiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(target: "gemini::generate", "Failed to parse JSON: {}. Response body:\n{}", e, body);
            e
        })?;

        let generation = convert_response(parsed);
        debug!(
            target: "gemini::generate",
            has_text = generation.text.is_some(),
            sources = generation.sources.len(),
            "response received"
        );
        Ok(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Generation {
        convert_response(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_chat_request_keeps_turn_order_and_roles() {
        let history = vec![
            ChatMessage::model("Hello!"),
            ChatMessage::user("My landlord kept my deposit"),
        ];
        let request = GenerateRequest::chat("m", &history, "rules".into(), true);
        let wire = serde_json::to_value(request.to_wire()).unwrap();

        assert_eq!(
            wire,
            json!({
                "contents": [
                    { "role": "model", "parts": [{ "text": "Hello!" }] },
                    { "role": "user", "parts": [{ "text": "My landlord kept my deposit" }] }
                ],
                "systemInstruction": { "parts": [{ "text": "rules" }] },
                "tools": [{ "googleSearch": {} }]
            })
        );
    }

    #[test]
    fn test_tools_omitted_without_search() {
        let request = GenerateRequest::single("m", "Analyze: x".into(), "rules".into(), false);
        let wire = serde_json::to_value(request.to_wire()).unwrap();
        assert!(wire.get("tools").is_none());
        assert_eq!(wire["contents"][0]["role"], "user");
    }

    #[test]
    fn test_text_parts_are_concatenated_and_thoughts_skipped() {
        let generation = parse(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "planning...", "thought": true },
                    { "text": "### Legal Fact Sorting\n" },
                    { "text": "- Deposit withheld" }
                ]}
            }]
        }));
        assert_eq!(generation.text.as_deref(), Some("### Legal Fact Sorting\n- Deposit withheld"));
        assert!(generation.sources.is_empty());
    }

    #[test]
    fn test_sources_dedup_by_uri_first_wins() {
        let generation = parse(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "answer" }] },
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "uri": "https://law.moj.gov.tw/a", "title": "Civil Code" } },
                    { "web": { "title": "no uri" } },
                    { "retrievedContext": { "uri": "ignored" } },
                    { "web": { "uri": "https://law.moj.gov.tw/a", "title": "Duplicate" } },
                    { "web": { "uri": "https://www.laf.org.tw" } }
                ]}
            }]
        }));
        assert_eq!(
            generation.sources,
            vec![
                Source { title: Some("Civil Code".into()), uri: "https://law.moj.gov.tw/a".into() },
                Source { title: None, uri: "https://www.laf.org.tw".into() },
            ]
        );
    }

    #[test]
    fn test_empty_response_has_no_text() {
        assert_eq!(parse(json!({})), Generation::default());
        assert_eq!(parse(json!({ "candidates": [{ "finishReason": "SAFETY" }] })).text, None);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        let client = GeminiClient::new("  ");
        let request = GenerateRequest::single("m", "x".into(), "rules".into(), false);
        let err = client.generate(&request).await.unwrap_err();
        assert!(matches!(err, GeminiError::MissingApiKey));
    }
}
