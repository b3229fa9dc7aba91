pub mod config;
pub mod errors;
pub mod gemini;
pub mod logging;
pub mod review;
pub mod web;

#[cfg(test)]
pub(crate) mod testing;
