//! glossa-api - HTTP API server for glossa

mod auth;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glossa_db::Database;
use glossa_inference::{PromptBoilerplate, PromptComposer, ResponsesClient};
use glossa_pipeline::AnnotationPipeline;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glossa=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let db = Database::connect(&database_url).await?;
    db.migrate().await?;

    let client = ResponsesClient::from_env()?;

    // Boilerplate is loaded once here and injected; the composer never
    // touches the filesystem per call.
    let boilerplate = match std::env::var("PROMPT_BOILERPLATE_PATH") {
        Ok(path) => PromptBoilerplate::load(std::path::Path::new(&path))
            .with_context(|| format!("failed to load prompt boilerplate from {}", path))?,
        Err(_) => PromptBoilerplate::empty(),
    };

    let pipeline = AnnotationPipeline::new(
        Arc::new(db.prompt_settings.clone()),
        Arc::new(db.transcripts.clone()),
        Arc::new(db.quota.clone()),
        Arc::new(db.notes.clone()),
        Arc::new(client),
        PromptComposer::new(boilerplate),
    );

    let app_state = AppState {
        db: db.clone(),
        pipeline: Arc::new(pipeline),
    };

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/transcripts/:id/annotations/generate",
            post(handlers::annotations::generate),
        )
        .route(
            "/transcripts/:id/annotations",
            get(handlers::annotations::list),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr: SocketAddr = std::env::var("GLOSSA_BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()
        .context("invalid GLOSSA_BIND_ADDR")?;

    info!(
        subsystem = "api",
        op = "startup",
        addr = %addr,
        "Starting glossa API server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
