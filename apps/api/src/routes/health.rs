use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and which webhooks are wired.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "vitae-api",
        "webhooks": {
            "tailor": state.config.tailor_webhook_url.is_some(),
            "match": state.config.match_webhook_url.is_some()
        }
    }))
}
