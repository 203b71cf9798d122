//! The customer-experience analyst: an agent whose only tool is
//! `filter_reviews`, answering free-text questions about the review table.

use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;
use crate::builder::AgentBuilder;
use crate::dataset::ReviewStore;
use crate::error::AgentError;
use crate::llm::AsyncLlmCaller;
use crate::tools::{register_filter_reviews, ToolRegistry};
use crate::trace::Trace;
use crate::types::AgentConfig;

pub const ANALYST_SYSTEM_PROMPT: &str = "\
You are a customer experience analysis assistant with access to a large number of client reviews. \
Your users are customer experience analysts who rely on you to filter and analyze reviews.

Workflow:
1. Filter the reviews: call `filter_reviews` with only the filters the user specified \
(city, date range, address fragment, state). Do not apply filters the user did not mention.
2. Analyze the reviews: use the filtered reviews to answer the user's question. \
If comparisons are requested, filter each subset separately before comparing.

If the tool returns \"No reviews found for the given filters.\", say that no reviews matched \
instead of analyzing that sentence.";

/// Answer plus the trace of how it was produced.
#[derive(Debug)]
pub struct AnalystReply {
    pub answer: String,
    pub trace:  Trace,
}

/// Holds the shared review store, tool registry and LLM for a chat session.
/// Each question runs a fresh agent; no conversational memory is kept.
pub struct AnalystSession {
    id:     Uuid,
    tools:  Arc<ToolRegistry>,
    llm:    Arc<dyn AsyncLlmCaller>,
    config: AgentConfig,
}

impl AnalystSession {
    pub fn new(store: Arc<ReviewStore>, llm: Arc<dyn AsyncLlmCaller>, config: AgentConfig) -> Self {
        let mut tools = ToolRegistry::new();
        register_filter_reviews(&mut tools, store);
        Self {
            id: Uuid::new_v4(),
            tools: Arc::new(tools),
            llm,
            config,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn ask(&self, question: &str) -> Result<AnalystReply, AgentError> {
        let mut engine = AgentBuilder::new(question)
            .system_prompt(ANALYST_SYSTEM_PROMPT)
            .config(self.config.clone())
            .llm(Arc::clone(&self.llm))
            .shared_tools(Arc::clone(&self.tools))
            .build()?;

        let span = tracing::info_span!("analyst_query", session = %self.id);
        let result = engine.run().instrument(span).await;
        tracing::info!(session = %self.id, steps = engine.memory.step, ok = result.is_ok(), "analyst query finished");

        let answer = result?;
        Ok(AnalystReply {
            answer,
            trace: std::mem::take(&mut engine.memory.trace),
        })
    }
}
