use std::env;

use anyhow::Context;

use docuchat::core::config::{AppPaths, Settings};
use docuchat::core::logging;
use docuchat::llm::OpenAiProvider;
use docuchat::rag::{self, SqliteRagStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let paths = AppPaths::new();
    logging::init(&paths);

    let settings = Settings::load(&paths).context("Failed to load configuration")?;
    let api_key = env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?;

    let provider = OpenAiProvider::new(settings.openai.base_url.clone(), api_key);
    let store = SqliteRagStore::with_path(paths.store_path.clone())
        .await
        .context("Failed to open vector store")?;

    let docs_dir = paths.project_root.join(&settings.ingest.docs_dir);
    tracing::info!("ingesting documents from {}", docs_dir.display());

    let report = rag::ingest::run(&settings, &provider, &store, &docs_dir)
        .await
        .context("Ingestion failed")?;

    tracing::info!(
        "ingestion complete: {} documents, {} chunks",
        report.documents,
        report.chunks
    );
    println!(
        "Indexed {} chunks from {} documents into {}",
        report.chunks,
        report.documents,
        paths.store_path.display()
    );

    Ok(())
}
