use thiserror::Error;
use crate::types::State;
use crate::events::Event;

/// Errors raised by the review filter, the theme aggregator and their I/O.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Invalid criteria: {0}")]
    Validation(String),

    #[error("Invalid address pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source:  regex::Error,
    },

    #[error("Classification failed: {0}")]
    Classification(String),

    #[error("Snapshot error at {path}: {reason}")]
    Persistence { path: String, reason: String },

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Agent failed: {0}")]
    AgentFailed(String),

    #[error("Invalid transition: {from} + {event} not in transition table")]
    InvalidTransition { from: State, event: Event },

    #[error("No handler registered for state: {0}")]
    NoHandlerForState(String),

    #[error("Safety cap exceeded after {0} iterations")]
    SafetyCapExceeded(usize),

    #[error("Build error: {0}")]
    BuildError(String),
}
