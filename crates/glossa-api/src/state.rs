//! Shared application state.

use std::sync::Arc;

use glossa_db::Database;
use glossa_pipeline::AnnotationPipeline;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub pipeline: Arc<AnnotationPipeline>,
}
