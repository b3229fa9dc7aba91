//! Gemini generative-content collaborator.
//!
//! The orchestrator only talks to the provider through two seams:
//! [`ClientFactory`] turns a caller's credential into a session, and
//! [`GenerativeClient`] ingests files and runs constrained generation.
//! `GeminiClient` is the REST implementation; tests substitute stubs.

pub mod client;
pub mod wire;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use client::{GeminiClient, GeminiClientFactory};
pub use wire::{FileRef, GenerateRequest, Part, Schema, SchemaType};

/// Errors raised while talking to the provider.
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Upload session did not return an upload URL")]
    MissingUploadUrl,

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Prompt was blocked: {0}")]
    Blocked(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Caller-supplied provider credential. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for an empty key.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.is_empty() { None } else { Some(Self(key)) }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// A session with the provider, bound to one credential.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Ingest a local file and return the provider's durable reference to it.
    async fn upload_file(&self, path: &Path, display_name: &str) -> Result<FileRef, GeminiError>;

    /// Run one generation request and return the raw response text.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, GeminiError>;
}

/// Builds a [`GenerativeClient`] for a credential.
pub trait ClientFactory: Send + Sync {
    fn connect(&self, api_key: &ApiKey) -> Result<Arc<dyn GenerativeClient>, GeminiError>;
}
