use std::collections::HashMap;
use std::sync::Arc;
use crate::dataset::ReviewStore;
use crate::engine::AgentEngine;
use crate::error::AgentError;
use crate::memory::AgentMemory;
use crate::tools::{register_filter_reviews, ToolRegistry, ToolFn};
use crate::llm::AsyncLlmCaller;
use crate::states::{
    AgentState, IdleState, PlanningState, ActingState,
    ObservingState, DoneState, ErrorState,
};
use crate::transitions::build_transition_table;
use crate::types::AgentConfig;

pub struct AgentBuilder {
    memory: AgentMemory,
    tools:  ToolRegistry,
    shared: Option<Arc<ToolRegistry>>,
    llm:    Option<Arc<dyn AsyncLlmCaller>>,
    config: Option<AgentConfig>,
}

impl AgentBuilder {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            memory: AgentMemory::new(task),
            tools:  ToolRegistry::new(),
            shared: None,
            llm:    None,
            config: None,
        }
    }

    pub fn task_type(mut self, t: impl Into<String>) -> Self {
        self.memory.task_type = t.into(); self
    }

    pub fn system_prompt(mut self, p: impl Into<String>) -> Self {
        self.memory.system_prompt = p.into(); self
    }

    pub fn llm(mut self, llm: Arc<dyn AsyncLlmCaller>) -> Self {
        self.llm = Some(llm); self
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = Some(config); self
    }

    pub fn max_steps(mut self, n: usize) -> Self {
        self.memory.config.max_steps = n; self
    }

    /// Sets the `"default"` model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.memory.config.models.insert("default".to_string(), model.into());
        self
    }

    pub fn tool(
        mut self,
        name:        impl Into<String>,
        description: impl Into<String>,
        schema:      serde_json::Value,
        func:        ToolFn,
    ) -> Self {
        self.tools.register(name, description, schema, func);
        self
    }

    /// Registers the `filter_reviews` tool over the given store.
    pub fn review_store(mut self, store: Arc<ReviewStore>) -> Self {
        register_filter_reviews(&mut self.tools, store);
        self
    }

    /// Uses an already-built registry (shared across queries of a session).
    /// Tools added with `.tool()` or `.review_store()` are ignored when set.
    pub fn shared_tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.shared = Some(tools); self
    }

    pub fn build(self) -> Result<AgentEngine, AgentError> {
        self.build_with_handlers(HashMap::new())
    }

    /// Any entry in `extra_handlers` replaces the default handler of that name.
    pub fn build_with_handlers(
        mut self,
        extra_handlers: HashMap<String, Box<dyn AgentState>>,
    ) -> Result<AgentEngine, AgentError> {
        let llm = self.llm
            .ok_or_else(|| AgentError::BuildError("LLM caller is required".to_string()))?;

        if let Some(config) = self.config {
            // Keep a model set via .model() unless the config names its own
            let models = std::mem::take(&mut self.memory.config.models);
            self.memory.config = config;
            for (task_type, model) in models {
                self.memory.config.models.entry(task_type).or_insert(model);
            }
        }

        let tools = match self.shared {
            Some(shared) => shared,
            None         => Arc::new(self.tools),
        };
        if tools.is_empty() {
            return Err(AgentError::BuildError("at least one tool is required".to_string()));
        }

        let defaults: [Box<dyn AgentState>; 6] = [
            Box::new(IdleState),
            Box::new(PlanningState),
            Box::new(ActingState),
            Box::new(ObservingState),
            Box::new(DoneState),
            Box::new(ErrorState),
        ];
        let mut handlers: HashMap<String, Box<dyn AgentState>> = defaults
            .into_iter()
            .map(|h| (h.name().to_string(), h))
            .collect();
        handlers.extend(extra_handlers);

        Ok(AgentEngine::new(
            self.memory,
            tools,
            llm,
            build_transition_table(),
            handlers,
        ))
    }
}
