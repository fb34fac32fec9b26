//! Agent module - the tool-calling orchestration engine.
//!
//! One user query runs through a bounded loop:
//! 1. Build the system prompt (instructions + prior conversation)
//! 2. Call the model with the tool schemas and round-specific guidance
//! 3. If the model requests tools, execute them in order and feed results back
//! 4. After the last tool round, make one final call with tools disabled

mod agent_loop;
mod prompt;
mod state;

pub use agent_loop::Orchestrator;
pub use prompt::{build_system_prompt, final_system_prompt, round_system_prompt, SYSTEM_PROMPT};
pub use state::{Generation, TerminationReason, ToolCallState, MAX_ROUNDS};
