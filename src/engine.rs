use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use crate::states::AgentState;
use crate::events::Event;
use crate::memory::AgentMemory;
use crate::tools::ToolRegistry;
use crate::llm::AsyncLlmCaller;
use crate::transitions::TransitionTable;
use crate::trace::Trace;
use crate::types::State;
use crate::error::AgentError;

/// Drives one analyst query through the state machine.
pub struct AgentEngine {
    pub memory:      AgentMemory,
    pub tools:       Arc<ToolRegistry>,
    pub llm:         Arc<dyn AsyncLlmCaller>,
    state:           State,
    transitions:     TransitionTable,
    handlers:        HashMap<String, Box<dyn AgentState>>,
    terminal_states: HashSet<String>,
}

impl AgentEngine {
    /// Prefer `AgentBuilder` for construction.
    pub fn new(
        memory:      AgentMemory,
        tools:       Arc<ToolRegistry>,
        llm:         Arc<dyn AsyncLlmCaller>,
        transitions: TransitionTable,
        handlers:    HashMap<String, Box<dyn AgentState>>,
    ) -> Self {
        let terminal_states = [State::done(), State::error()]
            .into_iter()
            .map(|s| s.0)
            .collect();
        Self {
            memory,
            tools,
            llm,
            state: State::idle(),
            transitions,
            handlers,
            terminal_states,
        }
    }

    /// Runs the query to a terminal state and returns the final answer.
    pub async fn run(&mut self) -> Result<String, AgentError> {
        let safety_cap = self.memory.config.max_steps * 3 + 2;
        let mut iterations = 0;

        while !self.terminal_states.contains(self.state.as_str()) {
            iterations += 1;
            if iterations > safety_cap {
                return Err(AgentError::SafetyCapExceeded(iterations));
            }
            self.step().await?;
        }

        // Terminal handlers only record the outcome
        if let Some(handler) = self.handlers.get(self.state.as_str()) {
            handler.handle(&mut self.memory, &self.tools, self.llm.as_ref()).await;
        }

        if self.state == State::done() {
            Ok(self.memory.final_answer.clone()
                .unwrap_or_else(|| "[No answer produced]".to_string()))
        } else {
            Err(AgentError::AgentFailed(
                self.memory.error.clone()
                    .unwrap_or_else(|| "Unknown error".to_string())
            ))
        }
    }

    /// Executes a single state transition.
    pub async fn step(&mut self) -> Result<(), AgentError> {
        let state_name = self.state.as_str();
        let handler = self.handlers.get(state_name)
            .ok_or_else(|| AgentError::NoHandlerForState(state_name.to_string()))?;

        let event: Event = handler.handle(&mut self.memory, &self.tools, self.llm.as_ref()).await;

        let next_state = self.transitions.get(&(self.state.clone(), event.clone()))
            .cloned()
            .ok_or_else(|| AgentError::InvalidTransition {
                from:  self.state.clone(),
                event: event.clone(),
            })?;

        tracing::info!(from = %self.state, event = %event, to = %next_state, "transition");
        self.state = next_state;
        Ok(())
    }

    pub fn trace(&self) -> &Trace {
        &self.memory.trace
    }

    pub fn current_state(&self) -> &State {
        &self.state
    }
}
