use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};

use super::wire::{ApiErrorBody, GenerateContentResponse, UploadResponse};
use super::{ApiKey, ClientFactory, FileRef, GeminiError, GenerateRequest, GenerativeClient};
use crate::config::GeminiConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";
const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// REST client for the Gemini API, bound to one API key.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Fails if the key cannot be sent as a header value.
    pub fn new(api_key: &ApiKey, config: &GeminiConfig) -> Result<Self, GeminiError> {
        let mut key = HeaderValue::from_str(api_key.expose())
            .map_err(|e| GeminiError::InvalidApiKey(e.to_string()))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn upload_file(&self, path: &Path, display_name: &str) -> Result<FileRef, GeminiError> {
        let data = tokio::fs::read(path).await.map_err(|source| GeminiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mime_type = guess_mime_type(display_name);

        // Resumable protocol: open a session, then send the bytes and finalize.
        let start = self
            .http
            .post(format!("{}/upload/v1beta/files", self.base_url))
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", data.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type.as_str())
            .json(&serde_json::json!({ "file": { "display_name": display_name } }))
            .send()
            .await?;
        let start = check_status(start).await?;

        let upload_url = start
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .ok_or(GeminiError::MissingUploadUrl)?;

        let finished = self
            .http
            .post(upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(data)
            .send()
            .await?;
        let finished = check_status(finished).await?;

        let uploaded: UploadResponse = finished.json().await?;
        tracing::debug!(
            file = %uploaded.file.name,
            mime = %uploaded.file.mime_type,
            "File ingested"
        );
        Ok(uploaded.file)
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, request.model
        );
        let response = self.http.post(url).json(&request.body()).send().await?;
        let response = check_status(response).await?;

        let parsed: GenerateContentResponse = response.json().await?;
        parsed.into_text()
    }
}

/// Turn a non-2xx response into `GeminiError::Api`, preferring the
/// provider's own `error.message`.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GeminiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .map(|b| b.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("Request failed").to_string()
            } else {
                trimmed.to_string()
            }
        });

    Err(GeminiError::Api {
        status: status.as_u16(),
        message,
    })
}

/// MIME type for an uploaded file, by extension.
///
/// Only types the model reads as documents are passed through; anything
/// else (`.java` guesses octet-stream, `.ts` guesses an MPEG stream) goes
/// out as `text/plain`.
pub fn guess_mime_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first()
        .filter(is_readable_mime)
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "text/plain".to_string())
}

fn is_readable_mime(mime: &mime_guess::Mime) -> bool {
    match (mime.type_().as_str(), mime.subtype().as_str()) {
        ("text", _) | ("image", _) => true,
        ("application", sub) => matches!(sub, "json" | "pdf" | "x-sh"),
        _ => false,
    }
}

/// Creates a [`GeminiClient`] per request from the shared provider config.
#[derive(Debug, Clone, Default)]
pub struct GeminiClientFactory {
    config: GeminiConfig,
}

impl GeminiClientFactory {
    pub fn new(config: GeminiConfig) -> Self {
        Self { config }
    }
}

impl ClientFactory for GeminiClientFactory {
    fn connect(&self, api_key: &ApiKey) -> Result<Arc<dyn GenerativeClient>, GeminiError> {
        let client: Arc<dyn GenerativeClient> = Arc::new(GeminiClient::new(api_key, &self.config)?);
        Ok(client)
    }
}
