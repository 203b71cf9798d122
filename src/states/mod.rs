use crate::events::Event;
use crate::memory::AgentMemory;
use crate::tools::ToolRegistry;
use crate::llm::AsyncLlmCaller;
use async_trait::async_trait;

mod idle;
mod planning;
mod acting;
mod observing;
mod done;
mod error;

pub use idle::IdleState;
pub use planning::PlanningState;
pub use acting::ActingState;
pub use observing::ObservingState;
pub use done::DoneState;
pub use error::ErrorState;

/// The contract every state handler fulfils.
///
/// `handle()` always returns an Event. Non-fatal problems (a failing tool,
/// a too-short answer) are recorded in `memory` and expressed as events;
/// they are never panics. Every call logs at least one trace entry.
#[async_trait]
pub trait AgentState: Send + Sync {
    /// Must match the key used in the engine's handler map.
    fn name(&self) -> &'static str;

    async fn handle(
        &self,
        memory: &mut AgentMemory,
        tools:  &ToolRegistry,
        llm:    &dyn AsyncLlmCaller,
    ) -> Event;
}
