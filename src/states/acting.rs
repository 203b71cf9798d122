use crate::states::AgentState;
use crate::events::Event;
use crate::memory::AgentMemory;
use crate::tools::ToolRegistry;
use crate::llm::AsyncLlmCaller;
use async_trait::async_trait;

pub struct ActingState;

#[async_trait]
impl AgentState for ActingState {
    fn name(&self) -> &'static str { "Acting" }

    async fn handle(
        &self,
        memory: &mut AgentMemory,
        tools:  &ToolRegistry,
        _llm:   &dyn AsyncLlmCaller,
    ) -> Event {
        let tool_call = match memory.current_tool_call.as_ref() {
            Some(tc) => tc.clone(),
            None => {
                memory.error = Some("ActingState called with no current_tool_call".to_string());
                memory.log("Acting", "FATAL_ERROR", "No current_tool_call");
                return Event::fatal_error();
            }
        };

        memory.log("Acting", "TOOL_EXECUTE", &format!("tool='{}'", tool_call.name));

        // Failures become observations the model can react to (e.g. fix a bad regex)
        match tools.execute(&tool_call.name, &tool_call.args) {
            Ok(result) => {
                memory.log("Acting", "TOOL_SUCCESS", &result.chars().take(100).collect::<String>());
                memory.last_observation = Some(format!("SUCCESS: {}", result));
                Event::tool_success()
            }
            Err(err) => {
                memory.log("Acting", "TOOL_FAILURE", &err);
                memory.last_observation = Some(format!("ERROR: {}", err));
                Event::tool_failure()
            }
        }
    }
}
