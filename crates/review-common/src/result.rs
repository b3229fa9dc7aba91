use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::task::{ReviewTask, TaskSet};

/// Markdown output of a review, keyed by task.
///
/// Serializes to a JSON object containing only the tasks that produced
/// text, e.g. `{"readme": "# Project ..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggest: Option<String>,
}

impl ReviewResult {
    /// Decode the model's JSON reply and keep only the requested tasks.
    ///
    /// Only requested keys are inspected: anything else, whatever its type,
    /// is dropped unread. Text that is not a JSON object, or a requested
    /// value that is neither a string nor `null`, is a decode error.
    pub fn from_model_output(text: &str, requested: &TaskSet) -> Result<Self, serde_json::Error> {
        let mut object: Map<String, Value> = serde_json::from_str(text)?;
        let mut result = ReviewResult::default();
        for task in requested.iter() {
            if let Some(value) = object.remove(task.as_str()) {
                *result.slot_mut(task) = serde_json::from_value(value)?;
            }
        }
        Ok(result.retain_requested(requested))
    }

    /// Drop entries that were not requested or carry no text.
    pub fn retain_requested(mut self, requested: &TaskSet) -> Self {
        for task in ReviewTask::ALL {
            let slot = self.slot_mut(task);
            let keep = requested.contains(task)
                && slot.as_deref().is_some_and(|text| !text.trim().is_empty());
            if !keep {
                *slot = None;
            }
        }
        self
    }

    pub fn get(&self, task: ReviewTask) -> Option<&str> {
        match task {
            ReviewTask::Readme => self.readme.as_deref(),
            ReviewTask::Debug => self.debug.as_deref(),
            ReviewTask::Suggest => self.suggest.as_deref(),
        }
    }

    pub fn set(&mut self, task: ReviewTask, text: impl Into<String>) {
        *self.slot_mut(task) = Some(text.into());
    }

    /// Tasks that have output, in declaration order.
    pub fn tasks(&self) -> TaskSet {
        ReviewTask::ALL
            .into_iter()
            .filter(|task| self.get(*task).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks().is_empty()
    }

    fn slot_mut(&mut self, task: ReviewTask) -> &mut Option<String> {
        match task {
            ReviewTask::Readme => &mut self.readme,
            ReviewTask::Debug => &mut self.debug,
            ReviewTask::Suggest => &mut self.suggest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks(ids: &[&str]) -> TaskSet {
        TaskSet::from_identifiers(ids.iter().copied())
    }

    #[test]
    fn decodes_conforming_reply() {
        let text = r##"{"readme": "# Project\nDescription", "suggest": "- Use async"}"##;
        let result = ReviewResult::from_model_output(text, &tasks(&["readme", "suggest"])).unwrap();
        assert_eq!(result.get(ReviewTask::Readme), Some("# Project\nDescription"));
        assert_eq!(result.get(ReviewTask::Suggest), Some("- Use async"));
        assert_eq!(result.get(ReviewTask::Debug), None);
    }

    #[test]
    fn drops_keys_that_were_not_requested() {
        let text = r##"{"readme": "# R", "debug": "bugs", "suggest": "ideas"}"##;
        let result = ReviewResult::from_model_output(text, &tasks(&["readme"])).unwrap();
        assert_eq!(result.tasks(), tasks(&["readme"]));

        let json = serde_json::to_value(&result).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["readme"]);
    }

    #[test]
    fn ignores_unknown_keys_and_nulls() {
        let text = r#"{"readme": null, "debug": "found one", "extra": 42}"#;
        let result = ReviewResult::from_model_output(text, &tasks(&["readme", "debug"])).unwrap();
        assert_eq!(result.tasks(), tasks(&["debug"]));
    }

    #[test]
    fn drops_blank_values() {
        let text = r#"{"readme": "   ", "debug": ""}"#;
        let result = ReviewResult::from_model_output(text, &tasks(&["readme", "debug"])).unwrap();
        assert!(result.is_empty());
        assert_eq!(serde_json::to_string(&result).unwrap(), "{}");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ReviewResult::from_model_output("{\"readme\": ", &tasks(&["readme"])).is_err());
        assert!(ReviewResult::from_model_output("not json", &tasks(&["readme"])).is_err());
    }

    #[test]
    fn wrong_shapes_are_errors() {
        assert!(ReviewResult::from_model_output("[]", &tasks(&["readme"])).is_err());
        assert!(ReviewResult::from_model_output(r#"{"readme": 7}"#, &tasks(&["readme"])).is_err());
    }

    #[test]
    fn unrequested_keys_are_not_type_checked() {
        let text = r##"{"readme": "# ok", "debug": 5, "suggest": ["a"]}"##;
        let result = ReviewResult::from_model_output(text, &tasks(&["readme"])).unwrap();
        assert_eq!(result.get(ReviewTask::Readme), Some("# ok"));
        assert_eq!(result.tasks(), tasks(&["readme"]));
    }

    #[test]
    fn set_and_get() {
        let mut result = ReviewResult::default();
        result.set(ReviewTask::Debug, "trace");
        assert_eq!(result.get(ReviewTask::Debug), Some("trace"));
        assert!(!result.is_empty());
    }
}
