//! Query pipeline tying the model loop, tools, retrieval and sessions together.

use std::sync::Arc;

use serde::Serialize;

use crate::agent::Orchestrator;
use crate::catalog::CourseRetriever;
use crate::config::Config;
use crate::llm::{AnthropicClient, LlmClient};
use crate::session::SessionManager;
use crate::tools::{CourseOutlineTool, CourseSearchTool, Source, ToolError, ToolManager};

/// Catalog summary for the courses endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseAnalytics {
    pub total_courses: usize,
    pub course_titles: Vec<String>,
}

/// Answers user questions about the course catalog.
pub struct RagSystem {
    orchestrator: Orchestrator,
    /// Registered tools; every query runs on its own fork.
    tools: ToolManager,
    retriever: Arc<dyn CourseRetriever>,
    sessions: SessionManager,
}

impl RagSystem {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        retriever: Arc<dyn CourseRetriever>,
        max_history: usize,
    ) -> Result<Self, ToolError> {
        let mut tools = ToolManager::new();
        tools.register(CourseSearchTool::new(retriever.clone()))?;
        tools.register(CourseOutlineTool::new(retriever.clone()))?;

        Ok(Self {
            orchestrator: Orchestrator::new(llm),
            tools,
            retriever,
            sessions: SessionManager::new(max_history),
        })
    }

    /// Build the production pipeline from configuration.
    pub fn from_config(config: &Config, retriever: Arc<dyn CourseRetriever>) -> anyhow::Result<Self> {
        let llm = Arc::new(AnthropicClient::new(&config.provider)?);
        Ok(Self::new(llm, retriever, config.max_history)?)
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Answer one question and return the answer with its sources.
    ///
    /// When `session_id` is given, prior exchanges feed the prompt and this
    /// exchange is recorded afterwards.
    pub async fn query(&self, query: &str, session_id: Option<&str>) -> (String, Vec<Source>) {
        let prompt = format!("Answer this question about course materials: {}", query);
        let history = match session_id {
            Some(id) => self.sessions.history(id).await,
            None => None,
        };

        let tools = self.tools.fork();
        let answer = self
            .orchestrator
            .generate(&prompt, history.as_deref(), Some(&tools))
            .await;
        let sources = tools.latest_sources().await;

        if let Some(id) = session_id {
            self.sessions.add_exchange(id, query, &answer).await;
        }

        tracing::info!(sources = sources.len(), "Answered query");
        (answer, sources)
    }

    pub async fn course_analytics(&self) -> anyhow::Result<CourseAnalytics> {
        let course_titles = self.retriever.course_titles().await?;
        Ok(CourseAnalytics {
            total_courses: course_titles.len(),
            course_titles,
        })
    }
}
