//! # glossa-pipeline
//!
//! The annotation-generation orchestrator: loads prompt settings and
//! in-scope lines, reserves quota, drives the two-phase
//! generate-then-resolve protocol against the model endpoint, and commits
//! the result transactionally while keeping the transcript status
//! consistent.

pub mod payload;
pub mod pipeline;
pub mod resolver;

pub use pipeline::{AnnotationPipeline, GenerationReport};
pub use resolver::LineResolver;
