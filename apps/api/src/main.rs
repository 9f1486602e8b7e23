mod config;
mod errors;
mod library;
mod llm_client;
mod report;
mod routes;
mod scoring;
mod state;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::library::Library;
use crate::llm_client::OpenAiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.rust_log)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerDNA API v{}", env!("CARGO_PKG_VERSION"));

    // Load the static content banks once; shared read-only across requests
    let library = Arc::new(Library::load(Path::new(&config.data_dir)));
    info!(
        "Banks loaded: {} strengths, {} environments, {} fit areas, {} subjects, {} role groups",
        library.strengths.len(),
        library.environments.len(),
        library.fit_areas.len(),
        library.subjects.len(),
        library.roles.len()
    );

    // Initialize the prose client (placeholder mode when no API key is set)
    let prose = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    ));
    info!("LLM client initialized (model chain: {:?})", prose.models());
    if config.dev_no_llm {
        info!("CDNA_DEV_NO_LLM is set — summaries will skip the LLM call");
    }

    let state = AppState {
        config: config.clone(),
        library,
        prose,
    };

    // Build router — CORS stays permissive, the frontend origin varies per deploy
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
