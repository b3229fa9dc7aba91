use std::fmt;

use review_common::TaskSet;

use crate::errors::ValidationError;
use crate::gemini::ApiKey;

/// A named file submitted for review.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Client-supplied file name. Empty names are skipped during ingestion.
    pub name: String,
    pub contents: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("bytes", &self.contents.len())
            .finish()
    }
}

/// A validated review request. Only constructible through [`ReviewRequest::new`].
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    api_key: ApiKey,
    tasks: TaskSet,
    files: Vec<SourceFile>,
}

impl ReviewRequest {
    /// Checks the credential, then the options, then the files, stopping at
    /// the first failure. Unknown option identifiers are dropped after the
    /// emptiness check.
    pub fn new<S: AsRef<str>>(
        api_key: Option<String>,
        options: &[S],
        files: Vec<SourceFile>,
    ) -> Result<Self, ValidationError> {
        let api_key = api_key
            .and_then(ApiKey::new)
            .ok_or(ValidationError::MissingApiKey)?;
        if options.is_empty() {
            return Err(ValidationError::NoTasks);
        }
        if files.is_empty() {
            return Err(ValidationError::NoFiles);
        }

        Ok(Self {
            api_key,
            tasks: TaskSet::from_identifiers(options),
            files,
        })
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    pub fn tasks(&self) -> &TaskSet {
        &self.tasks
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }
}
