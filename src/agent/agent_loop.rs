//! Bounded tool-calling loop.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::llm::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmClient, LlmError, Message, ToolChoice,
};
use crate::tools::ToolManager;

use super::prompt::{build_system_prompt, final_system_prompt, round_system_prompt};
use super::state::{Generation, TerminationReason, ToolCallState};

/// Drives up to [`MAX_ROUNDS`](super::MAX_ROUNDS) tool-enabled model calls,
/// then one tools-disabled call, for a single user query.
///
/// Every outcome is an answer string: provider and tool failures are folded
/// into error-shaped text and nothing is retried.
pub struct Orchestrator {
    llm: Arc<dyn LlmClient>,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Answer `query`, consulting `tools` when given.
    pub async fn generate(
        &self,
        query: &str,
        history: Option<&str>,
        tools: Option<&ToolManager>,
    ) -> String {
        self.generate_with_trace(query, history, tools).await.answer
    }

    /// Same as [`generate`](Self::generate), also returning the round trace.
    pub async fn generate_with_trace(
        &self,
        query: &str,
        history: Option<&str>,
        tools: Option<&ToolManager>,
    ) -> Generation {
        let mut state = ToolCallState::new(query);
        let system = build_system_prompt(history);
        let schemas = tools
            .filter(|manager| !manager.is_empty())
            .map(ToolManager::list_schemas);

        for _ in 0..state.max_rounds {
            let round = state.begin_round();
            debug!("Starting tool round {}", round);

            let request = CompletionRequest {
                system: round_system_prompt(&system, round),
                messages: state.messages.clone(),
                tools: schemas.clone(),
                tool_choice: schemas.as_ref().map(|_| ToolChoice::Auto),
            };

            let response = match self.llm.complete(&request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Completion call failed in round {}: {}", round, e);
                    return state.finish(
                        format!("Error generating response: {}", e),
                        TerminationReason::ProviderError,
                    );
                }
            };

            let manager = match tools {
                Some(manager) if response.wants_tools() => manager,
                _ => {
                    return match response.first_text() {
                        Some(text) => state.finish(text, TerminationReason::NoToolsRequested),
                        None => state.finish(
                            format!("Error generating response: {}", LlmError::EmptyResponse),
                            TerminationReason::ProviderError,
                        ),
                    };
                }
            };

            if let Err(failure) = execute_round_tools(&response, &mut state, manager).await {
                return state.finish(
                    format!("Unable to complete search: {}", failure),
                    TerminationReason::ToolExecutionError,
                );
            }
        }

        debug_assert!(state.is_complete());
        info!(
            "Tool rounds exhausted ({}), requesting final answer",
            state.tools_executed.join(", ")
        );

        let request = CompletionRequest {
            system: final_system_prompt(&system),
            messages: state.messages.clone(),
            tools: None,
            tool_choice: None,
        };

        match self.llm.complete(&request).await {
            Ok(response) => match response.first_text() {
                Some(text) => state.finish(text, TerminationReason::MaxRoundsReached),
                None => state.finish(
                    format!("Error generating final response: {}", LlmError::EmptyResponse),
                    TerminationReason::ProviderError,
                ),
            },
            Err(e) => {
                warn!("Final completion call failed: {}", e);
                state.finish(
                    format!("Error generating final response: {}", e),
                    TerminationReason::ProviderError,
                )
            }
        }
    }
}

/// Run every tool request of one response, in order, and append the
/// assistant turn plus the matching tool results to the conversation.
///
/// Stops at the first failing tool; results gathered before it are dropped.
async fn execute_round_tools(
    response: &CompletionResponse,
    state: &mut ToolCallState,
    manager: &ToolManager,
) -> Result<(), String> {
    let assistant_blocks: Vec<ContentBlock> = response
        .content
        .iter()
        .filter(|block| !matches!(block, ContentBlock::Other))
        .cloned()
        .collect();
    state.messages.push(Message::assistant_blocks(assistant_blocks));

    let mut results = Vec::new();
    for call in response.tool_uses() {
        info!(
            "[Round {}] Tool call: {} input={}",
            state.current_round, call.name, call.input
        );

        match manager.dispatch(call.name, call.input.clone()).await {
            Ok(output) => {
                debug!("[Round {}] Result: {}", state.current_round, preview(&output, 200));
                state.record_tool(call.name);
                results.push(ContentBlock::ToolResult {
                    tool_use_id: call.id.to_string(),
                    content: output,
                    is_error: false,
                });
            }
            Err(e) => {
                warn!("[Round {}] Tool {} failed: {}", state.current_round, call.name, e);
                return Err(format!("Tool {} failed: {}", call.name, e));
            }
        }
    }

    if !results.is_empty() {
        state.messages.push(Message::user_blocks(results));
    }
    Ok(())
}

/// Truncate on a char boundary for logging.
fn preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
