//! Shared domain types for review-desk.
//!
//! `ReviewTask` and `TaskSet` describe what the caller asked for;
//! `ReviewResult` is what comes back, restricted to those tasks.

pub mod result;
pub mod task;

pub use result::ReviewResult;
pub use task::{ReviewTask, TaskSet, UnknownTask};
