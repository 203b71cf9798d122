use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionMessageToolCall,
        ChatCompletionRequestMessage,
        ChatCompletionTool,
        ChatCompletionToolArgs,
        ChatCompletionToolType,
        CreateChatCompletionRequestArgs,
        FunctionObjectArgs,
    },
    Client,
};
use async_trait::async_trait;
use crate::llm::AsyncLlmCaller;
use crate::memory::AgentMemory;
use crate::tools::ToolRegistry;
use crate::types::{LlmResponse, ToolCall};
use std::collections::HashMap;

/// Model used when neither the agent config nor the caller names one.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub struct OpenAiCaller {
    client: Client<OpenAIConfig>,
}

impl OpenAiCaller {
    /// Standard OpenAI client using the OPENAI_API_KEY env var
    pub fn new() -> Self {
        Self { client: Client::new() }
    }

    fn build_tools(tools: &ToolRegistry) -> Result<Vec<ChatCompletionTool>, String> {
        tools.schemas().into_iter().map(|schema| {
            let function = FunctionObjectArgs::default()
                .name(schema.name)
                .description(schema.description)
                .parameters(schema.input_schema)
                .build()
                .map_err(|e| format!("Failed to build tool schema: {}", e))?;
            ChatCompletionToolArgs::default()
                .r#type(ChatCompletionToolType::Function)
                .function(function)
                .build()
                .map_err(|e| format!("Failed to build tool: {}", e))
        }).collect()
    }

    fn parse_tool_call(tc: &ChatCompletionMessageToolCall) -> Result<ToolCall, String> {
        let args: HashMap<String, serde_json::Value> = if tc.function.arguments.trim().is_empty() {
            HashMap::new()
        } else {
            serde_json::from_str(&tc.function.arguments)
                .map_err(|e| format!("Failed to parse tool args: {}", e))?
        };
        Ok(ToolCall {
            name: tc.function.name.clone(),
            args,
            id:   Some(tc.id.clone()),
        })
    }
}

impl Default for OpenAiCaller {
    fn default() -> Self { Self::new() }
}

#[async_trait]
impl AsyncLlmCaller for OpenAiCaller {
    async fn call_async(
        &self,
        memory: &AgentMemory,
        tools:  &ToolRegistry,
        model:  &str,
    ) -> Result<LlmResponse, String> {
        // serde round-trip from the provider-neutral JSON messages
        let messages: Vec<ChatCompletionRequestMessage> =
            serde_json::from_value(serde_json::Value::Array(memory.build_messages()))
                .map_err(|e| format!("Failed to build messages: {}", e))?;

        let model = if model.is_empty() { DEFAULT_MODEL } else { model };
        let oai_tools = Self::build_tools(tools)?;

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder.model(model).messages(messages);
        if !oai_tools.is_empty() {
            request_builder.tools(oai_tools);
        }

        let request = request_builder.build()
            .map_err(|e| format!("Failed to build request: {}", e))?;

        let response = self.client.chat()
            .create(request)
            .await
            .map_err(|e| format!("OpenAI API error: {}", e))?;

        let choice = response.choices.into_iter().next()
            .ok_or("Empty response from OpenAI")?;
        let message = choice.message;

        // A tool call takes priority over text content. The analyst runs one
        // tool per step, so only the first call is honoured.
        if let Some(tool_calls) = message.tool_calls {
            if tool_calls.len() > 1 {
                tracing::warn!(count = tool_calls.len(), "multiple tool calls returned; using the first");
            }
            if let Some(tc) = tool_calls.first() {
                return Ok(LlmResponse::ToolCall { tool: Self::parse_tool_call(tc)? });
            }
        }

        let content = message.content
            .ok_or("No content in OpenAI response")?;

        Ok(LlmResponse::FinalAnswer { content })
    }
}
