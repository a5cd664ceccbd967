//! # glossa-inference
//!
//! Language-model integration for the glossa annotation pipeline:
//!
//! - [`client::ResponsesClient`] — JSON-schema constrained calls to an
//!   OpenAI-compatible `/responses` endpoint
//! - [`parser`] — fallback JSON extraction and shape validation for model
//!   output text
//! - [`prompt`] — prompt composition from stored templates
//! - [`schemas`] — the JSON schemas sent with each phase's request
//! - [`mock`] — deterministic generator for tests

pub mod client;
pub mod mock;
pub mod parser;
pub mod prompt;
pub mod schemas;
pub mod types;

pub use client::{ResponsesClient, ResponsesConfig};
pub use mock::MockGenerator;
pub use parser::{parse_assignments, parse_notes};
pub use prompt::{PromptBoilerplate, PromptComposer};
