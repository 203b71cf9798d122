use crate::types::{ToolCall, HistoryEntry, AgentConfig};
use crate::trace::{TraceEntry, Trace};
use chrono::Utc;

/// Working memory for one analyst query.
#[derive(Debug)]
pub struct AgentMemory {
    // ── Task definition ──────────────────────────────────
    /// The analyst's question
    pub task:              String,
    /// Selects the model from `config.models` ("default" otherwise)
    pub task_type:         String,
    pub system_prompt:     String,

    // ── Execution state ──────────────────────────────────
    /// Incremented at the start of each Planning cycle
    pub step:              usize,
    /// Set by PlanningState, consumed by ActingState
    pub current_tool_call: Option<ToolCall>,
    /// Set by ActingState, consumed by ObservingState
    pub last_observation:  Option<String>,

    // ── History and results ──────────────────────────────
    pub history:           Vec<HistoryEntry>,
    pub final_answer:      Option<String>,
    pub error:             Option<String>,

    pub config:            AgentConfig,
    pub trace:             Trace,
}

impl AgentMemory {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task:              task.into(),
            task_type:         "default".to_string(),
            system_prompt:     String::new(),
            step:              0,
            current_tool_call: None,
            last_observation:  None,
            history:           Vec::new(),
            final_answer:      None,
            error:             None,
            config:            AgentConfig::default(),
            trace:             Trace::new(),
        }
    }

    /// Records an event into the trace. Called by every state handler.
    pub fn log(&mut self, state: &str, event: &str, data: &str) {
        tracing::debug!(state, event, data, step = self.step, "agent trace");
        self.trace.record(TraceEntry {
            step:      self.step,
            state:     state.to_string(),
            event:     event.to_string(),
            data:      data.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// Builds the chat-completions message array: system prompt, the
    /// question, then one assistant tool call + tool result per history entry.
    pub fn build_messages(&self) -> Vec<serde_json::Value> {
        let mut messages = Vec::new();

        if !self.system_prompt.is_empty() {
            messages.push(serde_json::json!({
                "role": "system",
                "content": self.system_prompt
            }));
        }

        messages.push(serde_json::json!({
            "role": "user",
            "content": &self.task
        }));

        for (idx, entry) in self.history.iter().enumerate() {
            let tool_id = entry.tool.id.clone()
                .unwrap_or_else(|| format!("call_{}", idx));

            messages.push(serde_json::json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": tool_id,
                    "type": "function",
                    "function": {
                        "name": entry.tool.name,
                        "arguments": serde_json::to_string(&entry.tool.args).unwrap_or_default()
                    }
                }]
            }));
            messages.push(serde_json::json!({
                "role": "tool",
                "tool_call_id": tool_id,
                "content": entry.observation
            }));
        }

        messages
    }
}
