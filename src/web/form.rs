//! Multipart form body of `POST /upload`.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;

use crate::errors::ValidationError;
use crate::review::{ReviewRequest, SourceFile};

/// Raw form fields, before validation.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: Vec<SourceFile>,
    pub api_key: Option<String>,
    pub options: Vec<String>,
}

impl UploadForm {
    /// Read every part. `files` and `options` may repeat; the first
    /// `api_key` wins. Other fields are ignored, as are `files` parts that
    /// carry no `filename` (an empty filename still counts).
    pub async fn read(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "files" => {
                    let Some(file_name) = field.file_name().map(str::to_string) else {
                        tracing::debug!("Ignoring files part without a filename");
                        continue;
                    };
                    let contents = field.bytes().await?;
                    form.files.push(SourceFile::new(file_name, contents));
                }
                "api_key" => {
                    let value = field.text().await?;
                    if form.api_key.is_none() {
                        form.api_key = Some(value);
                    }
                }
                "options" => form.options.push(field.text().await?),
                _ => tracing::debug!(field = %name, "Ignoring unexpected form field"),
            }
        }

        Ok(form)
    }
}

impl TryFrom<UploadForm> for ReviewRequest {
    type Error = ValidationError;

    fn try_from(form: UploadForm) -> Result<Self, Self::Error> {
        ReviewRequest::new(form.api_key, &form.options, form.files)
    }
}
