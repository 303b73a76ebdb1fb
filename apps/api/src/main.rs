mod config;
mod errors;
mod layout;
mod models;
mod render;
mod routes;
mod state;
mod storage;
mod tailoring;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::PageSpec;
use crate::render::docx::TemplateSource;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::OutputStore;
use crate::tailoring::WebhookClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Output directory for the generated PDF / DOCX
    let store = OutputStore::new(config.output_dir.clone());
    info!("Output directory: {}", store.dir().display());

    // DOCX template (re-read per render)
    let template = TemplateSource::from_path(config.docx_template_path.clone());
    match &template {
        TemplateSource::File(path) => info!("DOCX template: {}", path.display()),
        TemplateSource::Builtin => info!("DOCX template: built-in"),
    }

    // Tailoring webhooks
    let tailor = WebhookClient::new(
        config.tailor_webhook_url.clone(),
        config.match_webhook_url.clone(),
        Duration::from_secs(config.webhook_timeout_secs),
    )?;
    if config.tailor_webhook_url.is_none() {
        warn!("TAILOR_WEBHOOK_URL not set; /api/v1/tailor will answer 503");
    }
    if config.match_webhook_url.is_none() {
        warn!("MATCH_WEBHOOK_URL not set; /api/v1/match will answer 503");
    }

    // Build app state
    let state = AppState {
        store,
        template,
        page: PageSpec::letter(),
        tailor: Arc::new(tailor),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
