pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::render::handlers as render;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document API
        .route("/generate_pdf", post(render::handle_generate_pdf))
        .route("/generate_docx", post(render::handle_generate_docx))
        .route("/render/:format", post(render::handle_render))
        .route("/download/:format", get(render::handle_download))
        // Tailoring API
        .route("/api/v1/tailor", post(tailoring::handle_tailor))
        .route("/api/v1/match", post(tailoring::handle_match))
        .with_state(state)
}
