use crate::states::AgentState;
use crate::events::Event;
use crate::memory::AgentMemory;
use crate::tools::ToolRegistry;
use crate::llm::AsyncLlmCaller;
use crate::types::{LlmResponse, ToolCall};
use async_trait::async_trait;

pub struct PlanningState;

impl PlanningState {
    /// Model lookup order: `models[task_type]`, `models["default"]`, then
    /// `""` (the caller picks its own default).
    fn resolve_model<'a>(&self, memory: &'a AgentMemory) -> &'a str {
        let models = &memory.config.models;
        models
            .get(&memory.task_type)
            .or_else(|| models.get("default"))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    fn handle_tool_call(&self, memory: &mut AgentMemory, tool: ToolCall) -> Event {
        memory.log("Planning", "LLM_TOOL_CALL", &format!(
            "tool='{}' args={}", tool.name, serde_json::to_string(&tool.args).unwrap_or_default()
        ));
        memory.current_tool_call = Some(tool);
        Event::llm_tool_call()
    }

    fn handle_final_answer(&self, memory: &mut AgentMemory, content: String) -> Event {
        let len = content.trim().chars().count();
        if len < memory.config.min_answer_length {
            memory.log("Planning", "ANSWER_TOO_SHORT", &format!(
                "len={} min={}", len, memory.config.min_answer_length
            ));
            return Event::answer_too_short();
        }

        memory.log("Planning", "LLM_FINAL_ANSWER", &content.chars().take(100).collect::<String>());
        memory.final_answer = Some(content);
        Event::llm_final_answer()
    }
}

#[async_trait]
impl AgentState for PlanningState {
    fn name(&self) -> &'static str { "Planning" }

    async fn handle(
        &self,
        memory: &mut AgentMemory,
        tools:  &ToolRegistry,
        llm:    &dyn AsyncLlmCaller,
    ) -> Event {
        // 1. Guard: max steps
        if memory.step >= memory.config.max_steps {
            memory.error = Some(format!("Max steps {} exceeded", memory.config.max_steps));
            memory.log("Planning", "MAX_STEPS", &format!("step={}", memory.step));
            return Event::max_steps();
        }

        // 2. Next step
        memory.step += 1;
        memory.log("Planning", "STEP_START", &format!("step={}/{}", memory.step, memory.config.max_steps));

        // 3. Ask the model
        let model = self.resolve_model(memory).to_string();
        match llm.call_async(memory, tools, &model).await {
            Ok(LlmResponse::ToolCall { tool })        => self.handle_tool_call(memory, tool),
            Ok(LlmResponse::FinalAnswer { content }) => self.handle_final_answer(memory, content),
            Err(err) => {
                memory.log("Planning", "LLM_ERROR", &err);
                memory.error = Some(format!("LLM error: {}", err));
                Event::fatal_error()
            }
        }
    }
}
