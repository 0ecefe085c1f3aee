use std::sync::Arc;

use crate::chat::AgentInvoker;
use crate::config::Config;
use crate::scoring::scorer::ResumeScorer;
use crate::storage::BlobStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Provider clients are built once at startup and shared behind traits so
/// tests can substitute in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<dyn AgentInvoker>,
    pub store: Arc<dyn BlobStore>,
    pub scorer: Arc<dyn ResumeScorer>,
    pub config: Config,
}
