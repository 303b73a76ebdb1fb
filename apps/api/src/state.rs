use std::sync::Arc;

use crate::config::Config;
use crate::layout::PageSpec;
use crate::render::docx::TemplateSource;
use crate::storage::OutputStore;
use crate::tailoring::TailoringService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: OutputStore,
    /// DOCX template, re-read on every render.
    pub template: TemplateSource,
    /// Page geometry for the PDF renderer. Default: US letter.
    pub page: PageSpec,
    /// Pluggable tailoring backend. Default: WebhookClient.
    pub tailor: Arc<dyn TailoringService>,
}
