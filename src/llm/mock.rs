use std::sync::Mutex;
use crate::llm::AsyncLlmCaller;
use crate::memory::AgentMemory;
use crate::tools::ToolRegistry;
use crate::types::LlmResponse;
use async_trait::async_trait;

/// Replays scripted responses in order. Used by the tests; never touches
/// the network.
pub struct MockLlmCaller {
    responses: Mutex<Vec<Result<LlmResponse, String>>>,
    call_log:  Mutex<Vec<(String, usize)>>,  // (model, messages sent)
}

impl MockLlmCaller {
    pub fn new(responses: Vec<LlmResponse>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    /// Script failures as well as responses.
    pub fn with_results(results: Vec<Result<LlmResponse, String>>) -> Self {
        Self {
            responses: Mutex::new(results),
            call_log:  Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_log.lock().map(|log| log.len()).unwrap_or(0)
    }

    /// Model string passed to the Nth call (0-indexed)
    pub fn model_for_call(&self, n: usize) -> Option<String> {
        self.call_log.lock().ok()?
            .get(n)
            .map(|(model, _)| model.clone())
    }

    /// Number of chat messages sent on the Nth call (0-indexed)
    pub fn messages_for_call(&self, n: usize) -> Option<usize> {
        self.call_log.lock().ok()?
            .get(n)
            .map(|(_, count)| *count)
    }
}

#[async_trait]
impl AsyncLlmCaller for MockLlmCaller {
    async fn call_async(
        &self,
        memory: &AgentMemory,
        _tools: &ToolRegistry,
        model:  &str,
    ) -> Result<LlmResponse, String> {
        self.call_log.lock()
            .map_err(|_| "MockLlmCaller: call log poisoned".to_string())?
            .push((model.to_string(), memory.build_messages().len()));

        let mut responses = self.responses.lock()
            .map_err(|_| "MockLlmCaller: responses poisoned".to_string())?;
        if responses.is_empty() {
            return Err("MockLlmCaller: no more programmed responses".to_string());
        }
        responses.remove(0)
    }
}
