use std::sync::Arc;

use crate::config::Config;
use crate::library::Library;
use crate::llm_client::ProseGenerator;

/// Shared application state injected into all route handlers via Axum
/// extractors. The library is loaded once at startup and read-only from then
/// on; per-request scoring state never lives here.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub library: Arc<Library>,
    /// Pluggable prose backend. Default: `OpenAiClient` with its model
    /// fallback chain.
    pub prose: Arc<dyn ProseGenerator>,
}
