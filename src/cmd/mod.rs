//! CLI command implementations.
//!
//! | Module   | Commands handled |
//! |----------|------------------|
//! | `serve`  | `Serve`          |
//! | `review` | `Review`         |
//! | `config` | `Config`         |

pub mod config;
pub mod review;
pub mod serve;

pub use config::cmd_config;
pub use review::cmd_review;
pub use serve::cmd_serve;
