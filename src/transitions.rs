use std::collections::HashMap;
use crate::types::State;
use crate::events::Event;

pub type TransitionTable = HashMap<(State, Event), State>;

/// The analyst loop: plan, filter reviews, look at the summaries, plan
/// again, until the model answers or the step limit is hit. Any pair
/// missing here makes `AgentEngine::step()` fail with
/// `AgentError::InvalidTransition`.
pub fn build_transition_table() -> TransitionTable {
    let rows = [
        // question in
        (State::idle(),      Event::start(),            State::planning()),
        // model decides: filter, answer, or give up
        (State::planning(),  Event::llm_tool_call(),    State::acting()),
        (State::planning(),  Event::llm_final_answer(), State::done()),
        (State::planning(),  Event::answer_too_short(), State::planning()),
        (State::planning(),  Event::max_steps(),        State::error()),
        (State::planning(),  Event::fatal_error(),      State::error()),
        // a failed filter is still an observation for the model
        (State::acting(),    Event::tool_success(),     State::observing()),
        (State::acting(),    Event::tool_failure(),     State::observing()),
        (State::acting(),    Event::fatal_error(),      State::error()),
        (State::observing(), Event::r#continue(),       State::planning()),
    ];

    rows.into_iter()
        .map(|(from, event, to)| ((from, event), to))
        .collect()
}

/// True when `event` has a row for `state`. Done and Error have none.
pub fn is_valid_transition(table: &TransitionTable, state: &State, event: &Event) -> bool {
    table.contains_key(&(state.clone(), event.clone()))
}
