use crate::states::AgentState;
use crate::events::Event;
use crate::memory::AgentMemory;
use crate::tools::ToolRegistry;
use crate::llm::AsyncLlmCaller;
use async_trait::async_trait;

pub struct ErrorState;

#[async_trait]
impl AgentState for ErrorState {
    fn name(&self) -> &'static str { "Error" }

    async fn handle(
        &self,
        memory: &mut AgentMemory,
        _tools: &ToolRegistry,
        _llm:   &dyn AsyncLlmCaller,
    ) -> Event {
        let error_msg = memory.error.clone()
            .unwrap_or_else(|| "Unknown error".to_string());
        memory.log("Error", "AGENT_FAILED", &error_msg);
        Event::start()
    }
}
