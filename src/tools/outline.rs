//! Course outline tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Source, Tool, ToolOutput};
use crate::catalog::CourseRetriever;

/// Course structure: title, link and the numbered lesson list.
pub struct CourseOutlineTool {
    retriever: Arc<dyn CourseRetriever>,
}

#[derive(Debug, Deserialize)]
struct OutlineArgs {
    course_name: String,
}

#[derive(Debug, Deserialize)]
struct LessonEntry {
    #[serde(default)]
    lesson_number: Option<i64>,
    #[serde(default)]
    lesson_title: Option<String>,
}

impl CourseOutlineTool {
    pub fn new(retriever: Arc<dyn CourseRetriever>) -> Self {
        Self { retriever }
    }

    async fn outline(&self, course_title: &str) -> anyhow::Result<ToolOutput> {
        let Some(metadata) = self.retriever.course_outline(course_title).await? else {
            return Ok(ToolOutput::text(format!(
                "Course metadata not found for '{}'",
                course_title
            )));
        };

        let lessons_json = match metadata.lessons_json.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                return Ok(ToolOutput::text(format!(
                    "No lesson information available for '{}'",
                    course_title
                )))
            }
        };
        let mut lessons: Vec<LessonEntry> = serde_json::from_str(lessons_json)?;
        lessons.sort_by_key(|l| l.lesson_number.unwrap_or(0));

        let mut text = format!("**{}**\n", course_title);
        if let Some(link) = &metadata.link {
            text.push_str(&format!("Course Link: {}\n", link));
        }
        text.push_str(&format!("\n**Lessons ({} total):**\n", lessons.len()));
        for lesson in &lessons {
            let number = lesson
                .lesson_number
                .map_or_else(|| "?".to_string(), |n| n.to_string());
            let title = lesson.lesson_title.as_deref().unwrap_or("Untitled");
            text.push_str(&format!("{}. {}\n", number, title));
        }

        let source = Source::new(format!("{} - Course Outline", course_title), metadata.link);
        Ok(ToolOutput::with_sources(text, vec![source]))
    }
}

#[async_trait]
impl Tool for CourseOutlineTool {
    fn name(&self) -> &str {
        "get_course_outline"
    }

    fn description(&self) -> &str {
        "Get course structure, lesson list, titles, and navigation info. Use this to understand WHAT lessons exist and course organization, NOT to search content within lessons."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "course_name": {
                    "type": "string",
                    "description": "Course title or partial course name to get outline for"
                }
            },
            "required": ["course_name"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutput> {
        let args: OutlineArgs = serde_json::from_value(args)
            .map_err(|e| anyhow::anyhow!("Invalid arguments for {}: {}", self.name(), e))?;

        let Some(course_title) = self.retriever.resolve_course_name(&args.course_name).await else {
            return Ok(ToolOutput::text(format!(
                "No course found matching '{}'",
                args.course_name
            )));
        };

        // Bad metadata is reported to the model, not raised.
        match self.outline(&course_title).await {
            Ok(output) => Ok(output),
            Err(e) => {
                tracing::warn!("Outline for '{}' failed: {}", course_title, e);
                Ok(ToolOutput::text(format!("Error retrieving course outline: {}", e)))
            }
        }
    }
}
