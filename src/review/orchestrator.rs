use std::path::PathBuf;
use std::sync::Arc;

use review_common::ReviewResult;

use super::prompt;
use super::request::{ReviewRequest, SourceFile};
use super::staging::{StagingArea, sanitize_file_name};
use crate::errors::ReviewError;
use crate::gemini::{ClientFactory, FileRef, GenerateRequest, GenerativeClient};

/// Runs a validated [`ReviewRequest`] against the provider.
///
/// Constructed once at startup and shared by every request; holds no
/// per-request state.
#[derive(Clone)]
pub struct ReviewOrchestrator {
    factory: Arc<dyn ClientFactory>,
    staging_root: PathBuf,
    model: String,
}

impl ReviewOrchestrator {
    pub fn new(
        factory: Arc<dyn ClientFactory>,
        staging_root: impl Into<PathBuf>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            factory,
            staging_root: staging_root.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Connect, ingest every named file in order, generate once, decode.
    ///
    /// No step is retried. The request's staging directory is removed
    /// whether or not the run succeeds.
    #[tracing::instrument(
        name = "review",
        skip_all,
        fields(tasks = %request.tasks(), files = request.files().len(), model = %self.model)
    )]
    pub async fn run(&self, request: ReviewRequest) -> Result<ReviewResult, ReviewError> {
        let client = self
            .factory
            .connect(request.api_key())
            .map_err(ReviewError::Client)?;

        let staging = StagingArea::create(&self.staging_root)
            .await
            .map_err(|source| ReviewError::Staging {
                path: self.staging_root.clone(),
                source,
            })?;

        let outcome = self.review_with(client.as_ref(), &staging, &request).await;
        staging.cleanup().await;

        match &outcome {
            Ok(result) => tracing::info!(returned = %result.tasks(), "Review complete"),
            Err(e) => tracing::warn!(error = %e, path = ?e.local_path(), "Review failed"),
        }
        outcome
    }

    async fn review_with(
        &self,
        client: &dyn GenerativeClient,
        staging: &StagingArea,
        request: &ReviewRequest,
    ) -> Result<ReviewResult, ReviewError> {
        let files = ingest(client, staging, request.files()).await?;

        let generate = GenerateRequest {
            model: self.model.clone(),
            parts: prompt::build_parts(request.tasks(), &files),
            response_schema: prompt::response_schema(),
        };
        tracing::debug!(parts = generate.parts.len(), "Submitting generation request");

        let text = client
            .generate(&generate)
            .await
            .map_err(ReviewError::Generation)?;

        ReviewResult::from_model_output(&text, request.tasks()).map_err(ReviewError::Decode)
    }
}

/// Stage, upload and discard each file one at a time.
async fn ingest(
    client: &dyn GenerativeClient,
    staging: &StagingArea,
    files: &[SourceFile],
) -> Result<Vec<FileRef>, ReviewError> {
    let mut uploaded = Vec::with_capacity(files.len());

    for file in files {
        if file.name.is_empty() {
            continue;
        }
        let Some(name) = sanitize_file_name(&file.name) else {
            tracing::warn!(file = %file.name, "Skipping file with unusable name");
            continue;
        };

        let path = staging
            .stage(name, &file.contents)
            .await
            .map_err(|source| ReviewError::Staging {
                path: staging.path().join(name),
                source,
            })?;

        let file_ref = client
            .upload_file(&path, name)
            .await
            .map_err(|source| ReviewError::Ingestion {
                file: name.to_string(),
                source,
            })?;

        staging
            .discard(&path)
            .await
            .map_err(|source| ReviewError::Staging {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(file = %name, remote = %file_ref.name, "Uploaded");
        uploaded.push(file_ref);
    }

    Ok(uploaded)
}
