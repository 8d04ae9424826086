use std::sync::Arc;

use crate::config::Config;
use crate::preview::export::{CvExporter, PdfExporter, TextExporter};
use crate::wizard::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    /// Plain-text download. Default: `TextExporter`.
    pub text_exporter: Arc<dyn CvExporter>,
    /// PDF download. Stubbed until a renderer exists.
    pub pdf_exporter: Arc<dyn CvExporter>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sessions = SessionStore::new(config.max_sessions, config.session_idle_ttl);
        Self {
            config,
            sessions,
            text_exporter: Arc::new(TextExporter),
            pdf_exporter: Arc::new(PdfExporter),
        }
    }
}
