//! Course content search tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Source, Tool, ToolOutput};
use crate::catalog::{CourseRetriever, SearchResults};

/// Search inside course material, optionally filtered by course and lesson.
pub struct CourseSearchTool {
    retriever: Arc<dyn CourseRetriever>,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    course_name: Option<String>,
    /// Models sometimes send `"2"` instead of `2`; see [`lesson_filter`].
    #[serde(default)]
    lesson_number: Option<Value>,
}

/// Read a lesson filter given as an integer or a numeric string.
fn lesson_filter(raw: Option<&Value>) -> Result<Option<u32>, String> {
    let invalid = |v: &Value| format!("Invalid lesson_number {}: expected a lesson number like 1 or 2.", v);
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(v @ Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| invalid(v)),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v @ Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid(v)),
        Some(v) => Err(invalid(v)),
    }
}

impl CourseSearchTool {
    pub fn new(retriever: Arc<dyn CourseRetriever>) -> Self {
        Self { retriever }
    }

    async fn format_results(&self, results: SearchResults) -> ToolOutput {
        let mut blocks = Vec::with_capacity(results.matches.len());
        let mut sources = Vec::with_capacity(results.matches.len());

        for m in results.matches {
            let course_title = m.course_title.as_deref().unwrap_or("unknown");
            let label = match m.lesson_number {
                Some(n) => format!("{} - Lesson {}", course_title, n),
                None => course_title.to_string(),
            };

            let link = match m.lesson_number {
                Some(n) if m.course_title.is_some() => self.retriever.lesson_link(course_title, n).await,
                _ => None,
            };

            blocks.push(format!("[{}]\n{}", label, m.text));
            sources.push(Source::new(label, link));
        }

        ToolOutput::with_sources(blocks.join("\n\n"), sources)
    }
}

#[async_trait]
impl Tool for CourseSearchTool {
    fn name(&self) -> &str {
        "search_course_content"
    }

    fn description(&self) -> &str {
        "Search inside course materials for specific content, topics, concepts, or explanations. Use this to find detailed information WITHIN lessons."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to search for in the course content"
                },
                "course_name": {
                    "type": "string",
                    "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                },
                "lesson_number": {
                    "type": "integer",
                    "description": "Specific lesson number to search within (e.g. 1, 2, 3)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutput> {
        let args: SearchArgs = serde_json::from_value(args)
            .map_err(|e| anyhow::anyhow!("Invalid arguments for {}: {}", self.name(), e))?;
        let course_name = args.course_name.as_deref().filter(|c| !c.trim().is_empty());
        let lesson_number = match lesson_filter(args.lesson_number.as_ref()) {
            Ok(n) => n,
            Err(message) => return Ok(ToolOutput::text(message)),
        };

        let results = self
            .retriever
            .search(&args.query, course_name, lesson_number)
            .await;

        if let Some(error) = results.error {
            return Ok(ToolOutput::text(error));
        }

        if results.is_empty() {
            let mut filter_info = String::new();
            if let Some(course) = course_name {
                filter_info.push_str(&format!(" in course '{}'", course));
            }
            if let Some(lesson) = lesson_number {
                filter_info.push_str(&format!(" in lesson {}", lesson));
            }
            return Ok(ToolOutput::text(format!("No relevant content found{}.", filter_info)));
        }

        Ok(self.format_results(results).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogFile, Chunk, Course, InMemoryCatalog, Lesson, SearchMatch};
    use crate::tools::ToolManager;

    fn catalog() -> Arc<InMemoryCatalog> {
        Arc::new(InMemoryCatalog::from_catalog(
            CatalogFile {
                courses: vec![Course {
                    title: "X".to_string(),
                    link: None,
                    instructor: None,
                    lessons: vec![Lesson {
                        number: 3,
                        title: "Retrieval".to_string(),
                        link: Some("https://example.com/x/3".to_string()),
                    }],
                }],
                chunks: vec![
                    Chunk {
                        content: "Embeddings map text to vectors".to_string(),
                        course_title: "X".to_string(),
                        lesson_number: Some(3),
                    },
                    Chunk {
                        content: "Course wrap-up on vectors".to_string(),
                        course_title: "X".to_string(),
                        lesson_number: None,
                    },
                ],
            },
            5,
        ))
    }

    #[tokio::test]
    async fn empty_result_names_the_course_filter() {
        let tool = CourseSearchTool::new(catalog());
        let output = tool
            .execute(json!({"query": "quantum chromodynamics", "course_name": "X"}))
            .await
            .unwrap();
        assert_eq!(output.text, "No relevant content found in course 'X'.");
        assert!(output.sources.is_none());
    }

    #[tokio::test]
    async fn empty_result_through_manager_leaves_no_provenance() {
        let mut manager = ToolManager::new();
        manager.register(CourseSearchTool::new(catalog())).unwrap();
        let text = manager
            .dispatch("search_course_content", json!({"query": "nothing here", "course_name": "X"}))
            .await
            .unwrap();
        assert_eq!(text, "No relevant content found in course 'X'.");
        assert!(manager.latest_sources().await.is_empty());
    }

    #[tokio::test]
    async fn empty_result_mentions_lesson_filter() {
        let tool = CourseSearchTool::new(catalog());
        let output = tool
            .execute(json!({"query": "nothing", "course_name": "X", "lesson_number": 7}))
            .await
            .unwrap();
        assert_eq!(output.text, "No relevant content found in course 'X' in lesson 7.");
    }

    #[tokio::test]
    async fn matches_are_formatted_with_headers_and_sources() {
        let tool = CourseSearchTool::new(catalog());
        let output = tool.execute(json!({"query": "vectors"})).await.unwrap();

        assert_eq!(
            output.text,
            "[X - Lesson 3]\nEmbeddings map text to vectors\n\n[X]\nCourse wrap-up on vectors"
        );
        assert_eq!(
            output.sources,
            Some(vec![
                Source::new("X - Lesson 3", Some("https://example.com/x/3".to_string())),
                Source::new("X", None),
            ])
        );
    }

    #[tokio::test]
    async fn retrieval_errors_are_returned_as_text() {
        let tool = CourseSearchTool::new(catalog());
        let output = tool
            .execute(json!({"query": "vectors", "course_name": "Nonexistent"}))
            .await
            .unwrap();
        assert_eq!(output.text, "No course found matching 'Nonexistent'");
        assert!(output.sources.is_none());
    }

    #[tokio::test]
    async fn lesson_number_given_as_text_is_accepted() {
        let tool = CourseSearchTool::new(catalog());
        let output = tool
            .execute(json!({"query": "embeddings", "course_name": "X", "lesson_number": "3"}))
            .await
            .unwrap();
        assert_eq!(output.text, "[X - Lesson 3]\nEmbeddings map text to vectors");
    }

    #[tokio::test]
    async fn unusable_lesson_number_is_reported_to_the_model() {
        let tool = CourseSearchTool::new(catalog());
        for bad in [json!(-1), json!("two"), json!(2.5)] {
            let output = tool
                .execute(json!({"query": "vectors", "lesson_number": bad}))
                .await
                .expect("soft failure, not an error");
            assert!(output.text.starts_with("Invalid lesson_number"), "{}", output.text);
            assert!(output.sources.is_none());
        }
    }

    #[tokio::test]
    async fn missing_query_is_an_execution_error() {
        let tool = CourseSearchTool::new(catalog());
        let err = tool.execute(json!({"course_name": "X"})).await.unwrap_err();
        assert!(err.to_string().contains("search_course_content"));
    }

    #[tokio::test]
    async fn match_without_course_title_renders_unknown() {
        let tool = CourseSearchTool::new(catalog());
        let output = tool
            .format_results(SearchResults::from_matches(vec![SearchMatch {
                text: "orphan".to_string(),
                course_title: None,
                lesson_number: Some(1),
            }]))
            .await;
        assert_eq!(output.text, "[unknown - Lesson 1]\norphan");
        assert_eq!(output.sources, Some(vec![Source::new("unknown - Lesson 1", None)]));
    }
}
