//! # Course Assistant
//!
//! Answers questions about a corpus of course material by letting a language
//! model call retrieval tools across a bounded number of rounds.
//!
//! ## Architecture
//!
//! - [`agent::Orchestrator`] runs the round loop: ask the model, execute any
//!   requested tools, feed results back, and finish with a tools-disabled call
//!   once the round bound is reached
//! - [`tools::ToolManager`] registers tools by name, dispatches calls and keeps
//!   the provenance ("sources") of the latest lookups
//! - [`catalog::CourseRetriever`] is the retrieval contract the tools consume
//! - [`rag::RagSystem`] wires these together with per-session history
//! - [`api`] exposes the pipeline over HTTP
//!
//! ## Example
//!
//! ```rust,ignore
//! use course_assistant::{catalog::InMemoryCatalog, rag::RagSystem, Config};
//!
//! let config = Config::from_env()?;
//! let catalog = Arc::new(InMemoryCatalog::new(config.max_results));
//! let rag = RagSystem::from_config(&config, catalog)?;
//! let (answer, sources) = rag.query("How many lessons does the MCP course have?", None).await;
//! ```

pub mod agent;
pub mod api;
pub mod catalog;
pub mod config;
pub mod llm;
pub mod rag;
pub mod session;
pub mod tools;

pub use config::Config;
