use crate::states::AgentState;
use crate::events::Event;
use crate::memory::AgentMemory;
use crate::tools::ToolRegistry;
use crate::llm::AsyncLlmCaller;
use async_trait::async_trait;

pub struct IdleState;

#[async_trait]
impl AgentState for IdleState {
    fn name(&self) -> &'static str { "Idle" }

    async fn handle(
        &self,
        memory: &mut AgentMemory,
        tools:  &ToolRegistry,
        _llm:   &dyn AsyncLlmCaller,
    ) -> Event {
        let data = format!(
            "query='{}' tools={} max_steps={}",
            memory.task, tools.len(), memory.config.max_steps
        );
        memory.log("Idle", "QUERY_RECEIVED", &data);
        Event::start()
    }
}
