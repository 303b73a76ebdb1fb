//! Axum route handlers for the tailoring API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::tailoring::match_report::{parse_match_report, MatchReport};
use crate::tailoring::{MatchRequest, TailorRequest};

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    #[serde(flatten)]
    pub report: MatchReport,
    /// Unparsed webhook text, for callers that want to show it verbatim.
    pub raw: String,
}

/// POST /api/v1/tailor
///
/// Sends the job description and résumé URL to the tailoring webhook and returns
/// its JSON unchanged.
pub async fn handle_tailor(
    State(state): State<AppState>,
    payload: Result<Json<TailorRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    request.validate().map_err(AppError::Validation)?;

    info!("Tailoring resume at {}", request.file_url);
    let tailored = state.tailor.tailor(&request).await?;

    Ok(Json(tailored))
}

/// POST /api/v1/match
///
/// Asks the match webhook for a verdict and outreach drafts, then splits its text
/// into sections.
pub async fn handle_match(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    request.validate().map_err(AppError::Validation)?;

    let raw = state.tailor.match_resume(&request).await?;
    let report = parse_match_report(&raw);

    if !report.complete {
        warn!(
            responses = report.responses.len(),
            "Match report is incomplete"
        );
    }
    for label in report.empty_responses() {
        warn!("Match report response {label} has no content");
    }

    Ok(Json(MatchResponse { report, raw }))
}
