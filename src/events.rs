use serde::{Deserialize, Serialize};

/// What a state handler reports after one analyst step; the transition
/// table maps `(State, Event)` to the next state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event(pub String);

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A question was received.
    pub fn start() -> Self { Self::new("Start") }

    // ── Planning ─────────────────────────────────────────
    /// The model asked for `filter_reviews` (or some other tool).
    pub fn llm_tool_call() -> Self { Self::new("LlmToolCall") }
    /// The model answered the analyst's question.
    pub fn llm_final_answer() -> Self { Self::new("LlmFinalAnswer") }
    pub fn max_steps() -> Self { Self::new("MaxSteps") }
    /// The answer was too short to be an analysis; ask again.
    pub fn answer_too_short() -> Self { Self::new("AnswerTooShort") }
    /// The model could not be reached, or Acting had nothing to run.
    pub fn fatal_error() -> Self { Self::new("FatalError") }

    // ── Acting ───────────────────────────────────────────
    /// The filter ran; the observation holds the summaries (or the no-match sentence).
    pub fn tool_success() -> Self { Self::new("ToolSuccess") }
    /// Bad criteria, a bad address pattern or an unknown tool. The model sees
    /// the error and may retry with corrected arguments.
    pub fn tool_failure() -> Self { Self::new("ToolFailure") }

    // ── Observing ────────────────────────────────────────
    pub fn r#continue() -> Self { Self::new("Continue") }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
