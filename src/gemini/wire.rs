//! Request/response shapes for the Gemini REST API (`v1beta`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

use super::GeminiError;

/// Durable reference to a file ingested by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    /// Resource name, e.g. `files/abc123`.
    pub name: String,
    pub uri: String,
    pub mime_type: String,
}

/// One element of the prompt sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    File(FileRef),
}

impl Part {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(text) => Some(text),
            Part::File(_) => None,
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum PartBody<'a> {
    Text {
        text: &'a str,
    },
    File {
        #[serde(rename = "fileData")]
        file_data: FileData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData<'a> {
    mime_type: &'a str,
    file_uri: &'a str,
}

impl Serialize for Part {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = match self {
            Part::Text(text) => PartBody::Text {
                text: text.as_str(),
            },
            Part::File(file) => PartBody::File {
                file_data: FileData {
                    mime_type: &file.mime_type,
                    file_uri: &file.uri,
                },
            },
        };
        body.serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    Object,
    String,
}

/// Subset of the OpenAPI schema object accepted as `responseSchema`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl Schema {
    pub fn object(properties: BTreeMap<String, Schema>, required: Vec<String>) -> Self {
        Self {
            schema_type: SchemaType::Object,
            description: None,
            nullable: None,
            properties,
            required: Some(required),
        }
    }

    pub fn nullable_string(description: &str) -> Self {
        Self {
            schema_type: SchemaType::String,
            description: Some(description.to_string()),
            nullable: Some(true),
            properties: BTreeMap::new(),
            required: None,
        }
    }
}

/// A single generation call: prompt parts plus the output schema.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub parts: Vec<Part>,
    pub response_schema: Schema,
}

impl GenerateRequest {
    pub(crate) fn body(&self) -> GenerateContentBody<'_> {
        GenerateContentBody {
            contents: vec![Content {
                role: "user",
                parts: &self.parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &self.response_schema,
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: &'a [Part],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Schema,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub file: FileRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, skipping thought parts.
    pub(crate) fn into_text(self) -> Result<String, GeminiError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if !text.is_empty() {
            return Ok(text);
        }
        match self.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => Err(GeminiError::Blocked(reason)),
            None => Err(GeminiError::EmptyResponse),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn file_ref() -> FileRef {
        FileRef {
            name: "files/abc".to_string(),
            uri: "https://example.test/v1beta/files/abc".to_string(),
            mime_type: "text/x-python".to_string(),
        }
    }

    #[test]
    fn parts_serialize_to_gemini_shape() {
        let text = serde_json::to_value(Part::Text("hello".into())).unwrap();
        assert_eq!(text, json!({"text": "hello"}));

        let file = serde_json::to_value(Part::File(file_ref())).unwrap();
        assert_eq!(
            file,
            json!({"fileData": {
                "mimeType": "text/x-python",
                "fileUri": "https://example.test/v1beta/files/abc"
            }})
        );
    }

    #[test]
    fn request_body_carries_schema_and_mime_type() {
        let mut props = BTreeMap::new();
        props.insert("readme".to_string(), Schema::nullable_string("Full README.md text"));
        let request = GenerateRequest {
            model: "gemini-test".to_string(),
            parts: vec![Part::Text("do it".into()), Part::File(file_ref())],
            response_schema: Schema::object(props, vec![]),
        };

        let body = serde_json::to_value(request.body()).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 2);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        let schema = &body["generationConfig"]["responseSchema"];
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["required"], json!([]));
        assert_eq!(schema["properties"]["readme"]["type"], "STRING");
        assert_eq!(schema["properties"]["readme"]["nullable"], true);
    }

    #[test]
    fn response_text_joins_parts_and_skips_thoughts() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "{\"readme\":"},
                    {"text": " \"# Hi\"}"}
                ]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(resp.into_text().unwrap(), "{\"readme\": \"# Hi\"}");
    }

    #[test]
    fn blocked_prompt_reports_reason() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        match resp.into_text() {
            Err(GeminiError::Blocked(reason)) => assert_eq!(reason, "SAFETY"),
            other => panic!("Expected Blocked, got {:?}", other),
        }
    }

    #[test]
    fn missing_candidates_is_empty_response() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(resp.into_text(), Err(GeminiError::EmptyResponse)));
    }

    #[test]
    fn upload_response_ignores_extra_fields() {
        let resp: UploadResponse = serde_json::from_value(json!({
            "file": {
                "name": "files/abc",
                "displayName": "main.py",
                "mimeType": "text/x-python",
                "sizeBytes": "12",
                "uri": "https://example.test/v1beta/files/abc",
                "state": "ACTIVE"
            }
        }))
        .unwrap();
        assert_eq!(resp.file, file_ref());
    }
}
