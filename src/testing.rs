//! Test doubles for the provider seams and a multipart body builder.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, header};

use crate::gemini::{ApiKey, ClientFactory, FileRef, GeminiError, GenerateRequest, GenerativeClient};

#[derive(Default)]
struct Behaviour {
    reply: String,
    fail_connect: Option<String>,
    fail_upload: Option<String>,
    fail_generate: Option<String>,
}

struct UploadRecord {
    display_name: String,
    path: PathBuf,
    contents: Vec<u8>,
}

/// Deterministic in-memory provider that records every call.
#[derive(Default)]
pub struct StubProvider {
    behaviour: Behaviour,
    connects: AtomicUsize,
    uploads: Mutex<Vec<UploadRecord>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl StubProvider {
    fn with(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            ..Self::default()
        })
    }

    pub fn replying(reply: &str) -> Arc<Self> {
        Self::with(Behaviour {
            reply: reply.to_string(),
            ..Behaviour::default()
        })
    }

    pub fn failing_connect(message: &str) -> Arc<Self> {
        Self::with(Behaviour {
            fail_connect: Some(message.to_string()),
            ..Behaviour::default()
        })
    }

    pub fn failing_upload(message: &str) -> Arc<Self> {
        Self::with(Behaviour {
            fail_upload: Some(message.to_string()),
            ..Behaviour::default()
        })
    }

    pub fn failing_generate(message: &str) -> Arc<Self> {
        Self::with(Behaviour {
            fail_generate: Some(message.to_string()),
            ..Behaviour::default()
        })
    }

    pub fn factory(self: &Arc<Self>) -> Arc<dyn ClientFactory> {
        Arc::new(StubFactory(Arc::clone(self)))
    }

    pub fn connect_calls(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.display_name.clone())
            .collect()
    }

    pub fn uploaded_paths(&self) -> Vec<PathBuf> {
        self.uploads.lock().unwrap().iter().map(|u| u.path.clone()).collect()
    }

    pub fn uploaded_contents(&self) -> Vec<Vec<u8>> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.contents.clone())
            .collect()
    }
}

fn stub_error(message: &str) -> GeminiError {
    GeminiError::Api {
        status: 500,
        message: message.to_string(),
    }
}

#[async_trait]
impl GenerativeClient for StubProvider {
    async fn upload_file(&self, path: &Path, display_name: &str) -> Result<FileRef, GeminiError> {
        if let Some(message) = &self.behaviour.fail_upload {
            return Err(stub_error(message));
        }
        let contents = tokio::fs::read(path).await.map_err(|source| GeminiError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(UploadRecord {
            display_name: display_name.to_string(),
            path: path.to_path_buf(),
            contents,
        });
        let n = uploads.len();
        Ok(FileRef {
            name: format!("files/{}", n),
            uri: format!("https://stub.test/files/{}", n),
            mime_type: "text/plain".to_string(),
        })
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, GeminiError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.behaviour.fail_generate {
            Some(message) => Err(stub_error(message)),
            None => Ok(self.behaviour.reply.clone()),
        }
    }
}

struct StubFactory(Arc<StubProvider>);

impl ClientFactory for StubFactory {
    fn connect(&self, _api_key: &ApiKey) -> Result<Arc<dyn GenerativeClient>, GeminiError> {
        self.0.connects.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.0.behaviour.fail_connect {
            return Err(GeminiError::InvalidApiKey(message.clone()));
        }
        let client: Arc<dyn GenerativeClient> = self.0.clone();
        Ok(client)
    }
}

const BOUNDARY: &str = "review-desk-test-boundary";

/// Hand-rolled `multipart/form-data` body for router tests.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, contents: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, name, file_name
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(contents);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}
