//! Course Assistant - HTTP Server Entry Point
//!
//! Loads the course catalog and starts the HTTP API.

use std::sync::Arc;

use course_assistant::{api, catalog::InMemoryCatalog, config::Config, rag::RagSystem};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "course_assistant=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration: model={}", config.provider.model);

    let catalog = match &config.catalog_path {
        Some(path) => InMemoryCatalog::from_file(path, config.max_results).await?,
        None => {
            warn!("COURSE_CATALOG_PATH not set; starting with an empty catalog");
            InMemoryCatalog::new(config.max_results)
        }
    };

    let rag = RagSystem::from_config(&config, Arc::new(catalog))?;
    api::serve(&config, rag).await?;

    Ok(())
}
