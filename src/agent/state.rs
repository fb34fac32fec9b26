//! Per-call round state.

use crate::llm::Message;

/// Tool-enabled model calls allowed per query.
pub const MAX_ROUNDS: usize = 2;

/// Why a `generate` call stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The model answered in text without asking for tools.
    NoToolsRequested,
    /// All tool rounds were used; the answer came from the final call.
    MaxRoundsReached,
    /// A tool raised and the round was abandoned.
    ToolExecutionError,
    /// The completion API failed or returned nothing usable.
    ProviderError,
}

/// State scoped to one `generate` call.
#[derive(Debug)]
pub struct ToolCallState {
    pub current_round: usize,
    pub max_rounds: usize,
    pub messages: Vec<Message>,
    /// Diagnostics only; never consulted for control decisions.
    pub tools_executed: Vec<String>,
}

impl ToolCallState {
    pub fn new(query: &str) -> Self {
        Self {
            current_round: 0,
            max_rounds: MAX_ROUNDS,
            messages: vec![Message::user_text(query)],
            tools_executed: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_round >= self.max_rounds
    }

    /// Advance to the next round and return its 1-based number.
    pub fn begin_round(&mut self) -> usize {
        self.current_round += 1;
        self.current_round
    }

    pub fn record_tool(&mut self, name: &str) {
        self.tools_executed
            .push(format!("Round {}: {}", self.current_round, name));
    }

    pub fn finish(self, answer: impl Into<String>, termination: TerminationReason) -> Generation {
        Generation {
            answer: answer.into(),
            rounds: self.current_round,
            tools_executed: self.tools_executed,
            termination,
        }
    }
}

/// Answer plus a trace of how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub answer: String,
    /// Tool-enabled rounds started, including a failed one.
    pub rounds: usize,
    pub tools_executed: Vec<String>,
    pub termination: TerminationReason,
}
