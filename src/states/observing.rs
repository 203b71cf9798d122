use crate::states::AgentState;
use crate::events::Event;
use crate::memory::AgentMemory;
use crate::tools::ToolRegistry;
use crate::llm::AsyncLlmCaller;
use crate::types::HistoryEntry;
use async_trait::async_trait;

pub struct ObservingState;

#[async_trait]
impl AgentState for ObservingState {
    fn name(&self) -> &'static str { "Observing" }

    async fn handle(
        &self,
        memory: &mut AgentMemory,
        _tools: &ToolRegistry,
        _llm:   &dyn AsyncLlmCaller,
    ) -> Event {
        let tool_call = memory.current_tool_call.take();
        let observation = memory.last_observation.take();

        if let (Some(tool), Some(observation)) = (tool_call, observation) {
            let success = observation.starts_with("SUCCESS:");
            memory.history.push(HistoryEntry {
                step: memory.step,
                tool,
                observation,
                success,
            });
            let data = format!(
                "step={} success={} len={}", memory.step, success, memory.history.len()
            );
            memory.log("Observing", "HISTORY_COMMIT", &data);
        } else {
            memory.log("Observing", "NOTHING_TO_COMMIT", "");
        }

        Event::r#continue()
    }
}
