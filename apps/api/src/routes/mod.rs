pub mod health;

use std::time::Instant;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tracing::info;
use uuid::Uuid;

use crate::report::handlers::handle_summary;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/api/ping", get(health::ping_handler))
        .route("/api/summary", post(handle_summary))
        .layer(middleware::from_fn(request_log))
        .with_state(state)
}

/// Tags every request with a short id and logs start/finish with elapsed time.
async fn request_log(request: Request, next: Next) -> Response {
    let id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    info!("[{id}] {method} {path}");
    let response = next.run(request).await;
    info!(
        "[{id}] {method} {path} {} ({}ms)",
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}
