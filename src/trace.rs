use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    pub step:      usize,
    pub state:     String,
    pub event:     String,
    pub data:      String,
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of everything the analyst agent did during one query.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self { Self { entries: Vec::new() } }

    pub fn record(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose event name matches, e.g. `"TOOL_SUCCESS"`.
    pub fn with_event(&self, event: &str) -> Vec<&TraceEntry> {
        self.entries.iter().filter(|e| e.event == event).collect()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.entries)
            .unwrap_or_else(|_| "[]".to_string())
    }

    /// Renders the trace as a fixed-width table.
    pub fn render(&self) -> String {
        let mut out = format!("{:<6} {:<12} {:<20} {}\n", "step", "state", "event", "data");
        out.push_str(&"─".repeat(80));
        out.push('\n');
        for e in &self.entries {
            let data: String = e.data.chars().take(40).collect();
            out.push_str(&format!("{:<6} {:<12} {:<20} {}\n", e.step, e.state, e.event, data));
        }
        out
    }
}
