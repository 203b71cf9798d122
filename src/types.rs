use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named state in the analyst agent's state machine.
///
/// ```
/// use reviewsm::State;
/// assert!(State::done().is_terminal());
/// assert_eq!(State::planning().as_str(), "Planning");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State(pub String);

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for `"Done"` and `"Error"`.
    pub fn is_terminal(&self) -> bool {
        self.0 == "Done" || self.0 == "Error"
    }

    // ── Built-in states ─────────────────────────────────────────────────
    pub fn idle()      -> Self { Self::new("Idle") }
    pub fn planning()  -> Self { Self::new("Planning") }
    pub fn acting()    -> Self { Self::new("Acting") }
    pub fn observing() -> Self { Self::new("Observing") }
    pub fn done()      -> Self { Self::new("Done") }
    pub fn error()     -> Self { Self::new("Error") }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tool invocation requested by the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub args: HashMap<String, serde_json::Value>,
    pub id:   Option<String>,
}

/// A completed tool invocation stored in history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub step:        usize,
    pub tool:        ToolCall,
    pub observation: String,
    pub success:     bool,
}

/// What the LLM can return. Always one of these two variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LlmResponse {
    /// LLM wants to invoke a tool (for the analyst: `filter_reviews`)
    ToolCall { tool: ToolCall },
    /// LLM produced its narrative answer
    FinalAnswer { content: String },
}

/// Configuration for the analyst agent's loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Hard cap on number of planning/acting cycles
    pub max_steps: usize,

    /// Answers shorter than this (in characters) send the agent back to Planning
    pub min_answer_length: usize,

    /// Model selection map: task_type → model name. `"default"` is the fallback.
    pub models: HashMap<String, String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps:         8,
            min_answer_length: 5,
            models:            HashMap::new(),
        }
    }
}
