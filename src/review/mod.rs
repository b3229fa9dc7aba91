//! Review Request Orchestrator.
//!
//! ```text
//! ReviewRequest ──> ClientFactory::connect ──> GenerativeClient
//!      │                                           │
//!      │ for each named file:                      │
//!      │   StagingArea::stage ─> upload_file ──────┤ FileRef
//!      │   StagingArea::discard                    │
//!      │                                           │
//!      └─ prompt::build_parts + response_schema ─> generate ─> ReviewResult
//! ```
//!
//! | Module         | Responsibility                                          |
//! |----------------|---------------------------------------------------------|
//! | `request`      | `ReviewRequest` / `SourceFile`, boundary validation     |
//! | `prompt`       | System directive, task bullets, output schema           |
//! | `staging`      | Per-request transient directory for uploads             |
//! | `orchestrator` | `ReviewOrchestrator::run`                               |

pub mod orchestrator;
pub mod prompt;
pub mod request;
pub mod staging;

pub use orchestrator::ReviewOrchestrator;
pub use request::{ReviewRequest, SourceFile};
