use crate::memory::AgentMemory;
use crate::tools::ToolRegistry;
use crate::types::LlmResponse;
use async_trait::async_trait;

mod openai;
mod mock;
mod retry;

pub use openai::OpenAiCaller;
pub use mock::MockLlmCaller;
pub use retry::RetryingLlmCaller;

/// The single interface between the analyst agent (and `LlmClassifier`)
/// and any chat-completion provider.
///
/// # Contract
/// - Returns `Ok(LlmResponse)` on any valid LLM interaction
/// - Returns `Err(String)` for network, authentication or decoding failures
/// - Must offer every schema from `tools.schemas()` to the model
/// - Must build messages from `memory.build_messages()`
#[async_trait]
pub trait AsyncLlmCaller: Send + Sync {
    async fn call_async(
        &self,
        memory: &AgentMemory,
        tools:  &ToolRegistry,
        model:  &str,
    ) -> Result<LlmResponse, String>;
}
