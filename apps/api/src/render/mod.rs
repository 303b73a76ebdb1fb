// Document renderers.
// Implements: PDF canvas output (printpdf) and DOCX template filling (zip + quick-xml).
// Both are synchronous and CPU-bound; `run_blocking` moves them off the async executor.

pub mod docx;
pub mod handlers;
pub mod pdf;

use thiserror::Error;

pub use docx::DocxError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("DOCX error: {0}")]
    Docx(#[from] DocxError),

    #[error("Render task failed: {0}")]
    Task(String),
}

/// Runs a render closure inside `spawn_blocking`, flattening the join error.
pub async fn run_blocking<T, F>(f: F) -> Result<T, RenderError>
where
    F: FnOnce() -> Result<T, RenderError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RenderError::Task(format!("spawn_blocking failed: {e}")))?
}
