use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use serde_json::Value;
use crate::error::ReviewError;
use crate::llm::AsyncLlmCaller;
use crate::memory::AgentMemory;
use crate::tools::ToolRegistry;
use crate::types::LlmResponse;

/// Per-review classifier output: theme → sub-theme names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    pub themes: BTreeMap<String, Vec<String>>,
}

/// Text in, themes out. Implementations may fail for any reason; the
/// aggregator isolates each failure to its review.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ReviewError>;
}

const THEME_PROMPT: &str = r#"Analyze the following review and extract key themes and their specific sub-themes.
Each subtheme must belong to exactly one theme.
Use specific, descriptive labels (e.g. "Greeting and Welcome Experience" rather than "Shopping Experience").
Return ONLY a valid JSON object with this exact structure:
{
    "themes": {
        "theme1": {
            "reviews": [],
            "subthemes": {
                "subtheme1": [],
                "subtheme2": []
            }
        }
    }
}

Review text:
"#;

pub fn build_prompt(text: &str) -> String {
    format!("{}{}", THEME_PROMPT, text)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"));
    match body {
        Some(body) => body.trim_end().strip_suffix("```").unwrap_or(body).trim(),
        None       => trimmed,
    }
}

fn rejected(reason: impl Into<String>) -> ReviewError {
    ReviewError::Classification(reason.into())
}

/// Parses a raw model reply. Accepts an optional markdown code fence and
/// requires a top-level `themes` object whose values are objects with an
/// optional `subthemes` object. Anything else is rejected as a whole.
pub fn parse_classification(raw: &str) -> Result<ClassificationResult, ReviewError> {
    let body = strip_code_fence(raw);
    let value: Value = serde_json::from_str(body)
        .map_err(|e| rejected(format!("response is not valid JSON: {}", e)))?;

    let themes = value.get("themes")
        .ok_or_else(|| rejected("response has no 'themes' key"))?
        .as_object()
        .ok_or_else(|| rejected("'themes' is not an object"))?;

    let mut result = ClassificationResult::default();
    for (theme, data) in themes {
        let data = data.as_object()
            .ok_or_else(|| rejected(format!("theme '{}' is not an object", theme)))?;
        let subthemes = match data.get("subthemes") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Object(subs)) => subs.keys().cloned().collect(),
            Some(_) => return Err(rejected(format!("subthemes of '{}' is not an object", theme))),
        };
        result.themes.insert(theme.clone(), subthemes);
    }
    Ok(result)
}

// ── LLM-backed classifier ────────────────────────────────────────────────

/// Classifies through any chat-completion caller (OpenAI or a compatible
/// endpoint). No tools are offered; the reply must be the JSON document.
pub struct LlmClassifier {
    llm:   Arc<dyn AsyncLlmCaller>,
    model: String,
    tools: ToolRegistry,
}

impl LlmClassifier {
    pub fn new(llm: Arc<dyn AsyncLlmCaller>, model: impl Into<String>) -> Self {
        Self { llm, model: model.into(), tools: ToolRegistry::new() }
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ReviewError> {
        let memory = AgentMemory::new(build_prompt(text));
        match self.llm.call_async(&memory, &self.tools, &self.model).await {
            Ok(LlmResponse::FinalAnswer { content }) => parse_classification(&content),
            Ok(LlmResponse::ToolCall { tool }) => {
                Err(rejected(format!("model requested tool '{}' instead of answering", tool.name)))
            }
            Err(e) => Err(rejected(e)),
        }
    }
}

// ── Scripted classifier for tests ────────────────────────────────────────

/// Returns scripted raw replies keyed by the normalized review text, and
/// records every text it was asked to classify.
#[derive(Default)]
pub struct MockClassifier {
    replies: HashMap<String, Result<String, String>>,
    calls:   Mutex<Vec<String>>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a raw reply (parsed like a real model reply).
    pub fn reply(mut self, normalized: impl Into<String>, raw: impl Into<String>) -> Self {
        self.replies.insert(normalized.into(), Ok(raw.into()));
        self
    }

    /// Scripts a failed call.
    pub fn fail(mut self, normalized: impl Into<String>, error: impl Into<String>) -> Self {
        self.replies.insert(normalized.into(), Err(error.into()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ReviewError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(text.to_string());
        }
        match self.replies.get(text) {
            Some(Ok(raw))  => parse_classification(raw),
            Some(Err(msg)) => Err(rejected(msg.clone())),
            None           => Err(rejected(format!("no scripted reply for '{}'", text))),
        }
    }
}
