use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single analysis the caller can request for the uploaded files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewTask {
    Readme,
    Debug,
    Suggest,
}

impl ReviewTask {
    pub const ALL: [ReviewTask; 3] = [Self::Readme, Self::Debug, Self::Suggest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Readme => "readme",
            Self::Debug => "debug",
            Self::Suggest => "suggest",
        }
    }

    /// The bullet text sent to the model when this task is requested.
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Readme => "Create a complete, professional README.md.",
            Self::Debug => "Find errors, bugs, potential problems, and suggest fixes.",
            Self::Suggest => {
                "Suggest improvements: refactoring, performance, readability, best practices."
            }
        }
    }

    /// Field description used in the structured output schema.
    pub fn schema_description(&self) -> &'static str {
        match self {
            Self::Readme => "Full README.md text",
            Self::Debug => "Errors analysis and fix suggestions",
            Self::Suggest => "Code improving suggestions",
        }
    }
}

impl fmt::Display for ReviewTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown review task '{0}'. Valid values: readme, debug, suggest")]
pub struct UnknownTask(pub String);

impl FromStr for ReviewTask {
    type Err = UnknownTask;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "readme" => Ok(Self::Readme),
            "debug" => Ok(Self::Debug),
            "suggest" => Ok(Self::Suggest),
            _ => Err(UnknownTask(s.to_string())),
        }
    }
}

/// Deduplicated set of requested tasks, iterated in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSet(BTreeSet<ReviewTask>);

impl TaskSet {
    /// Build a set from raw identifiers, dropping anything unrecognised.
    pub fn from_identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        identifiers
            .into_iter()
            .filter_map(|id| id.as_ref().parse().ok())
            .collect()
    }

    pub fn contains(&self, task: ReviewTask) -> bool {
        self.0.contains(&task)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = ReviewTask> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ReviewTask> for TaskSet {
    fn from_iter<T: IntoIterator<Item = ReviewTask>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for TaskSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|t| t.as_str()).collect();
        f.write_str(&names.join(","))
    }
}
