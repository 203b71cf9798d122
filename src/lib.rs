pub mod types;
pub mod memory;
pub mod events;
pub mod transitions;
pub mod tools;
pub mod engine;
pub mod trace;
pub mod error;
pub mod builder;
pub mod states;
pub mod llm;
pub mod analyst;
pub mod config;
pub mod dataset;
pub mod filter;
pub mod themes;

// Convenience re-exports at crate root
pub use builder::AgentBuilder;
pub use engine::AgentEngine;
pub use memory::AgentMemory;
pub use types::{State, LlmResponse, ToolCall, HistoryEntry, AgentConfig};
pub use events::Event;
pub use tools::{ToolRegistry, ToolFn};
pub use llm::{AsyncLlmCaller, RetryingLlmCaller};
pub use trace::{TraceEntry, Trace};
pub use error::{AgentError, ReviewError};
pub use analyst::{AnalystSession, AnalystReply};
pub use config::{ClassifierProvider, ReviewConfig};
pub use dataset::{ReviewRecord, ReviewStore};
pub use filter::{filter, FilterCriteria, FilterOutcome, NO_MATCHES};
pub use themes::{aggregate, AggregationReport, Classifier, ThemeBucket, ThemeMap};
