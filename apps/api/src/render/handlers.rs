//! Axum route handlers for the document API.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::models::{PayloadError, ResumeData};
use crate::render::{docx::render_docx, pdf::render_resume_pdf, run_blocking};
use crate::state::AppState;
use crate::storage::DocumentFormat;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub message: String,
    pub filename: String,
    pub format: DocumentFormat,
    pub download_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replaced_placeholders: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved_placeholders: Option<Vec<String>>,
    pub generated_at: DateTime<Utc>,
}

struct Rendered {
    bytes: Vec<u8>,
    pages: Option<usize>,
    replaced: Option<usize>,
    unresolved: Option<Vec<String>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate_pdf
///
/// Renders the résumé to PDF and overwrites the stored copy.
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, AppError> {
    generate(&state, DocumentFormat::Pdf, &body).await
}

/// POST /generate_docx
///
/// Fills the DOCX template with the résumé and overwrites the stored copy.
pub async fn handle_generate_docx(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, AppError> {
    generate(&state, DocumentFormat::Docx, &body).await
}

/// POST /render/:format
///
/// Renders, stores and returns the document itself as an attachment.
pub async fn handle_render(
    State(state): State<AppState>,
    Path(format): Path<String>,
    body: Bytes,
) -> Result<Response, AppError> {
    let format = parse_format(&format)?;
    let data = resume_from_body(&body)?;
    let rendered = render_and_store(&state, format, data).await?;
    Ok(attachment(format, rendered.bytes))
}

/// GET /download/:format
///
/// Returns the most recently generated document of that format.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(format): Path<String>,
) -> Result<Response, AppError> {
    let format = parse_format(&format)?;
    let bytes = state.store.load(format).await?;
    Ok(attachment(format, bytes))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn generate(
    state: &AppState,
    format: DocumentFormat,
    body: &[u8],
) -> Result<Json<GenerateResponse>, AppError> {
    let data = resume_from_body(body)?;
    let rendered = render_and_store(state, format, data).await?;

    Ok(Json(GenerateResponse {
        message: format!("{format} generated successfully"),
        filename: format.file_name().to_string(),
        format,
        download_url: format.download_path(),
        pages: rendered.pages,
        replaced_placeholders: rendered.replaced,
        unresolved_placeholders: rendered.unresolved,
        generated_at: Utc::now(),
    }))
}

async fn render_and_store(
    state: &AppState,
    format: DocumentFormat,
    data: ResumeData,
) -> Result<Rendered, AppError> {
    let rendered = match format {
        DocumentFormat::Pdf => {
            let page = state.page.clone();
            let pdf = run_blocking(move || render_resume_pdf(&data, &page)).await?;
            Rendered {
                bytes: pdf.bytes,
                pages: Some(pdf.pages),
                replaced: None,
                unresolved: None,
            }
        }
        DocumentFormat::Docx => {
            let template = state.template.load().await?;
            let docx = run_blocking(move || Ok(render_docx(&template, &data)?)).await?;
            Rendered {
                bytes: docx.bytes,
                pages: None,
                replaced: Some(docx.replaced),
                unresolved: Some(docx.unresolved),
            }
        }
    };

    state.store.save(format, rendered.bytes.clone()).await?;
    info!(format = %format, bytes = rendered.bytes.len(), "Generated document");
    Ok(rendered)
}

/// Parses the raw request body. An empty body or falsy JSON means no data.
fn resume_from_body(body: &[u8]) -> Result<ResumeData, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(PayloadError::NoData.into());
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Request body is not valid JSON: {e}")))?;
    Ok(ResumeData::from_value(value)?)
}

fn parse_format(raw: &str) -> Result<DocumentFormat, AppError> {
    raw.parse::<DocumentFormat>().map_err(AppError::NotFound)
}

fn attachment(format: DocumentFormat, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", format.file_name()),
            ),
        ],
        bytes,
    )
        .into_response()
}
