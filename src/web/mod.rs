//! HTTP surface: the upload form and its JSON endpoint.
//!
//! ```text
//! ┌─────────┐  GET /, /styles.css, /index.js  ┌──────────────────────────────┐
//! │ Browser │ ──────────────────────────────> │ server.rs (Router, assets)   │
//! │         │  POST /upload (multipart)       │   └─ api.rs (upload, errors) │
//! │         │ <────────────────────────────── │        └─ form.rs (DTO)      │
//! └─────────┘  JSON ReviewResult / {"error"}  │             │                │
//!                                             │             v                │
//!                                             │  review::ReviewOrchestrator  │
//!                                             └──────────────────────────────┘
//! ```

pub mod api;
pub mod embedded;
pub mod form;
pub mod server;
