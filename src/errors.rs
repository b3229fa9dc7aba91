//! Typed error hierarchy for review-desk.
//!
//! Three enums cover the request lifecycle:
//! - `ValidationError`: the request is rejected before any provider call
//! - `GeminiError`: the provider client failed (re-exported from `gemini`)
//! - `ReviewError`: everything the orchestrator can return

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use crate::gemini::GeminiError;

/// Input rejected at the boundary. Messages are shown verbatim to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("API key required")]
    MissingApiKey,

    #[error("Select at least one option")]
    NoTasks,

    #[error("No files uploaded")]
    NoFiles,
}

/// Errors from a single review run.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{0}")]
    Client(#[source] GeminiError),

    /// Displays only the final path component; `path` keeps the full
    /// location for logs.
    #[error("Failed to stage {}: {source}", last_component(.path))]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to upload {file}: {source}")]
    Ingestion {
        file: String,
        #[source]
        source: GeminiError,
    },

    #[error("{0}")]
    Generation(#[source] GeminiError),

    #[error("Model returned invalid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ReviewError {
    /// True when the caller sent a bad request rather than the provider failing.
    pub fn is_validation(&self) -> bool {
        matches!(self, ReviewError::Invalid(_))
    }

    /// Local filesystem path involved in the failure, if any.
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            ReviewError::Staging { path, .. } => Some(path),
            _ => None,
        }
    }
}

fn last_component(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
