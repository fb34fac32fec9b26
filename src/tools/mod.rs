//! Tools the model may call, and the registry that dispatches them.
//!
//! Tools are stateless: each execution returns its text together with any
//! provenance it produced. The [`ToolManager`] keeps the latest provenance
//! batch per tool so callers can read it once the model loop is done.

mod outline;
mod search;

pub use outline::CourseOutlineTool;
pub use search::CourseSearchTool;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::llm::ToolSchema;

/// Registration failures. These are startup configuration errors.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool must have a 'name' in its definition")]
    MissingName,
}

/// Where a piece of supporting text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Source {
    pub fn new(text: impl Into<String>, link: Option<String>) -> Self {
        Self {
            text: text.into(),
            link,
        }
    }
}

/// Result of one tool execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    /// Text handed back to the model.
    pub text: String,
    /// `Some` replaces the tool's provenance batch; `None` leaves it alone.
    pub sources: Option<Vec<Source>>,
}

impl ToolOutput {
    /// Output without provenance.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: None,
        }
    }

    pub fn with_sources(text: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            text: text.into(),
            sources: Some(sources),
        }
    }
}

/// Trait for tools the model can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call this tool.
    fn name(&self) -> &str;

    /// What the tool does, shown to the model.
    fn description(&self) -> &str;

    /// JSON Schema of the argument object.
    fn parameters_schema(&self) -> Value;

    /// Run the tool. Errors abort the current model round.
    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutput>;

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.parameters_schema(),
        }
    }
}

struct RegisteredTool {
    tool: Arc<dyn Tool>,
    sources: Mutex<Vec<Source>>,
}

/// Registry of available tools, keyed by name, in registration order.
#[derive(Default)]
pub struct ToolManager {
    tools: Vec<RegisteredTool>,
    by_name: HashMap<String, usize>,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under the name in its schema.
    ///
    /// Registering the same name twice replaces the earlier tool but keeps
    /// its position in the schema list.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<(), ToolError> {
        self.register_arc(Arc::new(tool))
    }

    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.schema().name;
        if name.trim().is_empty() {
            return Err(ToolError::MissingName);
        }

        let entry = RegisteredTool {
            tool,
            sources: Mutex::new(Vec::new()),
        };
        let existing = self.by_name.get(&name).copied();
        match existing {
            Some(idx) => self.tools[idx] = entry,
            None => {
                self.by_name.insert(name, self.tools.len());
                self.tools.push(entry);
            }
        }
        Ok(())
    }

    /// Same tools, fresh provenance slots.
    ///
    /// A query that runs on its own fork cannot see or clobber the sources
    /// of a query running concurrently on another fork.
    pub fn fork(&self) -> Self {
        Self {
            tools: self
                .tools
                .iter()
                .map(|entry| RegisteredTool {
                    tool: entry.tool.clone(),
                    sources: Mutex::new(Vec::new()),
                })
                .collect(),
            by_name: self.by_name.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Schemas of every registered tool, in registration order.
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.tool.schema()).collect()
    }

    /// Execute a tool by name.
    ///
    /// An unknown name is not an error: the model gets a not-found message
    /// and can react to it. Tool failures are returned to the caller.
    pub async fn dispatch(&self, name: &str, args: Value) -> anyhow::Result<String> {
        let Some(&idx) = self.by_name.get(name) else {
            tracing::warn!("Model requested unknown tool: {}", name);
            return Ok(format!("Tool '{}' not found", name));
        };

        let entry = &self.tools[idx];
        let output = entry.tool.execute(args).await?;
        if let Some(sources) = output.sources {
            *entry.sources.lock().await = sources;
        }
        Ok(output.text)
    }

    /// The first non-empty provenance batch, scanning tools in registration order.
    pub async fn latest_sources(&self) -> Vec<Source> {
        for entry in &self.tools {
            let sources = entry.sources.lock().await;
            if !sources.is_empty() {
                return sources.clone();
            }
        }
        Vec::new()
    }

    /// Clear every tool's provenance batch.
    pub async fn reset_sources(&self) {
        for entry in &self.tools {
            entry.sources.lock().await.clear();
        }
    }
}
