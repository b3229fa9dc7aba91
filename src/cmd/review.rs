//! `review-desk review`: one-shot review from the command line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use review_desk::config::DeskConfig;
use review_desk::gemini::GeminiClientFactory;
use review_desk::review::{ReviewOrchestrator, ReviewRequest, SourceFile};

pub async fn cmd_review(
    config: &DeskConfig,
    api_key: Option<String>,
    tasks: &[String],
    files: &[PathBuf],
    pretty: bool,
) -> Result<()> {
    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        let contents = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        sources.push(SourceFile::new(name, contents));
    }

    let request = ReviewRequest::new(api_key, tasks, sources)?;

    let factory = Arc::new(GeminiClientFactory::new(config.gemini.clone()));
    let orchestrator = ReviewOrchestrator::new(
        factory,
        config.server.staging_dir.clone(),
        config.gemini.model.clone(),
    );
    let result = orchestrator.run(request).await?;

    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);
    Ok(())
}
