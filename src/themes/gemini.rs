use async_trait::async_trait;
use crate::error::ReviewError;
use super::classifier::{build_prompt, parse_classification, ClassificationResult, Classifier};

// ── Gemini request types ─────────────────────────────────

#[derive(serde::Serialize)]
struct GenerateRequest {
    contents: Vec<GeminiContent>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role:  Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

// ── Gemini response types ────────────────────────────────

#[derive(serde::Deserialize, Debug)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(serde::Deserialize, Debug)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

// ── Classifier ───────────────────────────────────────────

/// Calls the Gemini `generateContent` REST endpoint.
pub struct GeminiClassifier {
    client:   reqwest::Client,
    api_key:  String,
    api_base: String,
    model:    String,
}

impl GeminiClassifier {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client:   reqwest::Client::new(),
            api_key:  api_key.into(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model:    model.into(),
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self, ReviewError> {
        let key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| ReviewError::Config("GEMINI_API_KEY not set".to_string()))?;
        Ok(Self::new(key, model))
    }

    /// Points the client at another host (a proxy or a local stub).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    async fn generate(&self, prompt: String) -> Result<String, String> {
        let body = GenerateRequest {
            contents: vec![GeminiContent {
                role:  Some("user".to_string()),
                parts: vec![GeminiPart { text: Some(prompt) }],
            }],
        };

        let response = self.client
            .post(format!("{}/models/{}:generateContent", self.api_base, self.model))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type",   "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body   = response.text().await.unwrap_or_default();
            return Err(format!("Gemini API error {}: {}", status, body));
        }

        let parsed: GenerateResponse = response.json()
            .await
            .map_err(|e| format!("Failed to parse Gemini response: {}", e))?;
        response_text(parsed)
    }
}

/// Concatenates the text parts of the first candidate.
fn response_text(response: GenerateResponse) -> Result<String, String> {
    let text: String = response.candidates.into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err("Gemini returned no text".to_string());
    }
    Ok(text)
}

#[async_trait]
impl Classifier for GeminiClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ReviewError> {
        let raw = self.generate(build_prompt(text)).await
            .map_err(ReviewError::Classification)?;
        parse_classification(&raw)
    }
}
