//! In-memory course catalog (non-persistent).
//!
//! Backs local runs and tests. Matching is plain word overlap; it exists so
//! the service works without an external index, not to rank well.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{CourseOutlineMetadata, CourseRetriever, SearchMatch, SearchResults};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub number: u32,
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub course_title: String,
    #[serde(default)]
    pub lesson_number: Option<u32>,
}

/// On-disk catalog format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub chunks: Vec<Chunk>,
}

#[derive(Clone)]
pub struct InMemoryCatalog {
    data: Arc<CatalogFile>,
    max_results: usize,
}

impl InMemoryCatalog {
    pub fn new(max_results: usize) -> Self {
        Self::from_catalog(CatalogFile::default(), max_results)
    }

    pub fn from_catalog(catalog: CatalogFile, max_results: usize) -> Self {
        Self {
            data: Arc::new(catalog),
            max_results,
        }
    }

    /// Load a catalog from a JSON file.
    pub async fn from_file(path: &Path, max_results: usize) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read catalog {}: {}", path.display(), e))?;
        let catalog: CatalogFile = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Invalid catalog {}: {}", path.display(), e))?;
        tracing::info!(
            courses = catalog.courses.len(),
            chunks = catalog.chunks.len(),
            "Loaded course catalog from {}",
            path.display()
        );
        Ok(Self::from_catalog(catalog, max_results))
    }
}

fn words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Exact (case-insensitive) title match first, then first title containing the input.
fn resolve_in(courses: &[Course], partial: &str) -> Option<String> {
    let needle = partial.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    courses
        .iter()
        .find(|c| c.title.to_lowercase() == needle)
        .or_else(|| courses.iter().find(|c| c.title.to_lowercase().contains(&needle)))
        .map(|c| c.title.clone())
}

#[async_trait]
impl CourseRetriever for InMemoryCatalog {
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> SearchResults {
        let data = &self.data;

        let course_title = match course_name {
            Some(name) => match resolve_in(&data.courses, name) {
                Some(title) => Some(title),
                None => return SearchResults::failed(format!("No course found matching '{}'", name)),
            },
            None => None,
        };

        let terms = words(query);
        let mut scored: Vec<(usize, &Chunk)> = data
            .chunks
            .iter()
            .filter(|chunk| course_title.as_deref().map_or(true, |t| chunk.course_title == t))
            .filter(|chunk| lesson_number.map_or(true, |n| chunk.lesson_number == Some(n)))
            .map(|chunk| (words(&chunk.content).intersection(&terms).count(), chunk))
            .filter(|(score, _)| *score > 0)
            .collect();
        // Stable: equal scores keep insertion order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let matches = scored
            .into_iter()
            .take(self.max_results)
            .map(|(_, chunk)| SearchMatch {
                text: chunk.content.clone(),
                course_title: Some(chunk.course_title.clone()),
                lesson_number: chunk.lesson_number,
            })
            .collect();

        SearchResults::from_matches(matches)
    }

    async fn resolve_course_name(&self, partial: &str) -> Option<String> {
        resolve_in(&self.data.courses, partial)
    }

    async fn lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String> {
        let data = &self.data;
        data.courses
            .iter()
            .find(|c| c.title == course_title)?
            .lessons
            .iter()
            .find(|l| l.number == lesson_number)?
            .link
            .clone()
    }

    async fn course_outline(&self, course_title: &str) -> anyhow::Result<Option<CourseOutlineMetadata>> {
        let data = &self.data;
        let Some(course) = data.courses.iter().find(|c| c.title == course_title) else {
            return Ok(None);
        };

        let lessons_json = if course.lessons.is_empty() {
            None
        } else {
            let lessons: Vec<_> = course
                .lessons
                .iter()
                .map(|l| {
                    json!({
                        "lesson_number": l.number,
                        "lesson_title": l.title,
                        "lesson_link": l.link,
                    })
                })
                .collect();
            Some(serde_json::to_string(&lessons)?)
        };

        Ok(Some(CourseOutlineMetadata {
            link: course.link.clone(),
            lessons_json,
        }))
    }

    async fn course_titles(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.data.courses.iter().map(|c| c.title.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> CatalogFile {
        CatalogFile {
            courses: vec![
                Course {
                    title: "MCP: Build Rich-Context AI Apps".to_string(),
                    link: Some("https://example.com/mcp".to_string()),
                    instructor: Some("Elie".to_string()),
                    lessons: vec![
                        Lesson {
                            number: 1,
                            title: "Why MCP".to_string(),
                            link: Some("https://example.com/mcp/1".to_string()),
                        },
                        Lesson {
                            number: 2,
                            title: "Servers".to_string(),
                            link: None,
                        },
                    ],
                },
                Course {
                    title: "Prompt Compression".to_string(),
                    link: None,
                    instructor: None,
                    lessons: vec![],
                },
            ],
            chunks: vec![
                Chunk {
                    content: "MCP servers expose tools and resources".to_string(),
                    course_title: "MCP: Build Rich-Context AI Apps".to_string(),
                    lesson_number: Some(2),
                },
                Chunk {
                    content: "Why a protocol for tools matters".to_string(),
                    course_title: "MCP: Build Rich-Context AI Apps".to_string(),
                    lesson_number: Some(1),
                },
                Chunk {
                    content: "Compression shortens prompts and tools output".to_string(),
                    course_title: "Prompt Compression".to_string(),
                    lesson_number: None,
                },
            ],
        }
    }

    #[tokio::test]
    async fn resolves_exact_then_partial_names() {
        let catalog = InMemoryCatalog::from_catalog(sample(), 5);
        assert_eq!(
            catalog.resolve_course_name("prompt compression").await.as_deref(),
            Some("Prompt Compression")
        );
        assert_eq!(
            catalog.resolve_course_name("MCP").await.as_deref(),
            Some("MCP: Build Rich-Context AI Apps")
        );
        assert_eq!(catalog.resolve_course_name("Rust").await, None);
        assert_eq!(catalog.resolve_course_name("   ").await, None);
    }

    #[tokio::test]
    async fn search_orders_by_overlap_and_applies_filters() {
        let catalog = InMemoryCatalog::from_catalog(sample(), 5);

        let all = catalog.search("servers tools", None, None).await;
        assert!(all.error.is_none());
        assert_eq!(all.matches.len(), 3);
        assert_eq!(all.matches[0].lesson_number, Some(2));

        let filtered = catalog.search("tools", Some("mcp"), Some(1)).await;
        assert_eq!(filtered.matches.len(), 1);
        assert_eq!(filtered.matches[0].text, "Why a protocol for tools matters");

        let capped = InMemoryCatalog::from_catalog(sample(), 1).search("tools", None, None).await;
        assert_eq!(capped.matches.len(), 1);
    }

    #[tokio::test]
    async fn unknown_course_filter_is_an_error() {
        let catalog = InMemoryCatalog::from_catalog(sample(), 5);
        let results = catalog.search("tools", Some("Haskell"), None).await;
        assert!(results.is_empty());
        assert_eq!(results.error.as_deref(), Some("No course found matching 'Haskell'"));
    }

    #[tokio::test]
    async fn outline_metadata_carries_lessons_as_json() {
        let catalog = InMemoryCatalog::from_catalog(sample(), 5);
        let meta = catalog
            .course_outline("MCP: Build Rich-Context AI Apps")
            .await
            .expect("outline")
            .expect("course exists");
        assert_eq!(meta.link.as_deref(), Some("https://example.com/mcp"));
        let lessons: serde_json::Value =
            serde_json::from_str(meta.lessons_json.as_deref().expect("lessons")).expect("valid json");
        assert_eq!(lessons[1]["lesson_title"], "Servers");

        let empty = catalog.course_outline("Prompt Compression").await.unwrap().unwrap();
        assert!(empty.lessons_json.is_none());
        assert!(catalog.course_outline("Nope").await.unwrap().is_none());

        assert_eq!(
            catalog.lesson_link("MCP: Build Rich-Context AI Apps", 1).await.as_deref(),
            Some("https://example.com/mcp/1")
        );
        assert_eq!(catalog.lesson_link("MCP: Build Rich-Context AI Apps", 2).await, None);
    }

    #[tokio::test]
    async fn loads_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"courses": [{{"title": "Intro", "lessons": [{{"number": 1, "title": "Start"}}]}}]}}"#
        )
        .unwrap();

        let catalog = InMemoryCatalog::from_file(file.path(), 5).await.expect("loads");
        assert_eq!(catalog.course_titles().await.unwrap(), vec!["Intro".to_string()]);

        let meta = catalog.course_outline("Intro").await.unwrap().unwrap();
        assert!(meta.link.is_none());
        assert!(meta.lessons_json.expect("lessons").contains("\"lesson_title\":\"Start\""));
    }

    #[tokio::test]
    async fn invalid_catalog_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").unwrap();
        let err = InMemoryCatalog::from_file(file.path(), 5).await.err().expect("fails");
        assert!(err.to_string().contains("Invalid catalog"));
    }
}
