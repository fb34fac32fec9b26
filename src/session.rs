//! Conversation sessions.
//!
//! Each session keeps a bounded list of the most recent user/assistant
//! messages; older messages fall off the front.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::llm::Role;

#[derive(Debug, Clone, PartialEq)]
struct SessionMessage {
    role: Role,
    content: String,
}

/// In-memory session store.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Vec<SessionMessage>>>>,
    counter: Arc<AtomicU64>,
    max_history: usize,
}

impl SessionManager {
    /// `max_history` is the number of exchanges (user + assistant pairs) kept.
    pub fn new(max_history: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            counter: Arc::new(AtomicU64::new(0)),
            max_history,
        }
    }

    pub async fn create_session(&self) -> String {
        let id = format!("session_{}", self.counter.fetch_add(1, Ordering::SeqCst) + 1);
        self.sessions.write().await.insert(id.clone(), Vec::new());
        id
    }

    /// Record one exchange, creating the session if it does not exist.
    pub async fn add_exchange(&self, session_id: &str, user: &str, assistant: &str) {
        let mut sessions = self.sessions.write().await;
        let messages = sessions.entry(session_id.to_string()).or_default();
        messages.push(SessionMessage {
            role: Role::User,
            content: user.to_string(),
        });
        messages.push(SessionMessage {
            role: Role::Assistant,
            content: assistant.to_string(),
        });

        let limit = self.max_history * 2;
        if messages.len() > limit {
            let excess = messages.len() - limit;
            messages.drain(..excess);
        }
    }

    /// Prior conversation rendered for the system prompt, if there is any.
    pub async fn history(&self, session_id: &str) -> Option<String> {
        let sessions = self.sessions.read().await;
        let messages = sessions.get(session_id)?;
        if messages.is_empty() {
            return None;
        }
        let lines: Vec<String> = messages
            .iter()
            .map(|m| {
                let speaker = match m.role {
                    Role::User => "User",
                    Role::Assistant => "Assistant",
                };
                format!("{}: {}", speaker, m.content)
            })
            .collect();
        Some(lines.join("\n"))
    }

    /// Forget a session's messages. Unknown ids are ignored.
    pub async fn clear_session(&self, session_id: &str) {
        if let Some(messages) = self.sessions.write().await.get_mut(session_id) {
            messages.clear();
        }
    }
}
