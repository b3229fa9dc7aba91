//! Prompt construction and the structured output schema.

use std::collections::BTreeMap;

use review_common::{ReviewTask, TaskSet};

use crate::gemini::{FileRef, Part, Schema};

/// Fixed directive sent ahead of the task list.
pub const SYSTEM_PROMPT: &str = r##"You are a code review expert. Review the uploaded project files and answer **IN JSON FORMAT ONLY**.

Rules:
- The response must be a single valid JSON object that conforms to the provided JSON schema.
- Allowed keys: only "readme", "debug", "suggest".
- Include a key ONLY if the corresponding task was explicitly requested.
- ONLY REQUESTED keys MUST be present in the JSON.
- Every value for a requested key MUST be a non-empty string.

Accuracy and assumptions:
- Write ONLY what can be confidently derived from the provided code and files.
- DO NOT invent features, dependencies, configuration or behaviour that the files do not clearly contain.
- If something cannot be determined from the files, say so explicitly instead of guessing.
- Never assume a deployment environment, operating system, cloud provider or runtime unless the code defines it.

Dependencies and versions:
- When describing dependencies or installation steps, list ONLY libraries that are directly imported or referenced in the code.
- If a library version is not pinned in the files (e.g. requirements.txt, pyproject.toml, package.json, Cargo.toml), do not mention a version.

Formatting:
- Use Markdown for headings, lists and inline code inside the string values.
- Do not write anything outside the JSON object.
- No trailing commas and no invalid JSON.

Sample response:
{"readme": "# Project\nDescription...", "suggest": "- Use async...\n- Add type hints"}
"##;

const TASK_HEADER: &str = "Complete the following tasks:\n";

/// One `- <instruction>` bullet per requested task.
pub fn task_instructions(tasks: &TaskSet) -> String {
    let mut text = String::from(TASK_HEADER);
    for task in tasks.iter() {
        text.push_str("- ");
        text.push_str(task.instruction());
        text.push('\n');
    }
    text
}

/// Object schema with every task as an optional, nullable string.
///
/// Restricting the reply to the requested keys is left to the prompt and to
/// `ReviewResult::retain_requested`; the schema itself requires nothing.
pub fn response_schema() -> Schema {
    let properties: BTreeMap<String, Schema> = ReviewTask::ALL
        .into_iter()
        .map(|task| {
            (
                task.as_str().to_string(),
                Schema::nullable_string(task.schema_description()),
            )
        })
        .collect();
    Schema::object(properties, Vec::new())
}

/// Directive, task list, then the ingested files in upload order.
pub fn build_parts(tasks: &TaskSet, files: &[FileRef]) -> Vec<Part> {
    let mut parts = Vec::with_capacity(files.len() + 2);
    parts.push(Part::Text(SYSTEM_PROMPT.to_string()));
    parts.push(Part::Text(task_instructions(tasks)));
    parts.extend(files.iter().cloned().map(Part::File));
    parts
}
