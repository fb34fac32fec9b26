//! Retrieval over indexed course material.
//!
//! Tools never see how content is indexed; they consume the
//! [`CourseRetriever`] contract only.

mod memory;

pub use memory::{CatalogFile, Chunk, Course, InMemoryCatalog, Lesson};

use async_trait::async_trait;

/// One piece of matched course text.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch {
    pub text: String,
    pub course_title: Option<String>,
    pub lesson_number: Option<u32>,
}

/// Outcome of a content search.
///
/// A populated `error` means the search could not run (e.g. the course
/// filter did not resolve); `matches` is then empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub matches: Vec<SearchMatch>,
    pub error: Option<String>,
}

impl SearchResults {
    pub fn from_matches(matches: Vec<SearchMatch>) -> Self {
        Self { matches, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            matches: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Course-level metadata used to render an outline.
///
/// Lessons are kept as the raw JSON the catalog stores; decoding happens in
/// the outline tool so a malformed record surfaces as tool text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseOutlineMetadata {
    pub link: Option<String>,
    pub lessons_json: Option<String>,
}

/// Retrieval backend consumed by the course tools.
#[async_trait]
pub trait CourseRetriever: Send + Sync {
    /// Search course content, optionally restricted to a course and lesson.
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> SearchResults;

    /// Resolve a partial course name to its canonical title.
    async fn resolve_course_name(&self, partial: &str) -> Option<String>;

    /// Link to a specific lesson, if known.
    async fn lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String>;

    /// Outline metadata for a canonical course title.
    async fn course_outline(&self, course_title: &str) -> anyhow::Result<Option<CourseOutlineMetadata>>;

    /// All known course titles.
    async fn course_titles(&self) -> anyhow::Result<Vec<String>>;
}
