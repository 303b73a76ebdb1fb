//! DOCX rendering by `{{placeholder}}` substitution inside a template package.

pub mod archive;
pub mod placeholders;
pub mod substitute;
pub mod template;

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::ResumeData;

pub use archive::DocxArchive;
pub use placeholders::PlaceholderMap;
pub use template::TemplateSource;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Template is missing required part: {0}")]
    MissingPart(String),
}

#[derive(Debug, Clone)]
pub struct DocxRender {
    pub bytes: Vec<u8>,
    pub replaced: usize,
    pub unresolved: Vec<String>,
}

/// Fills `template` with values from `data` across the body, headers and footers.
pub fn render_docx(template: &[u8], data: &ResumeData) -> Result<DocxRender, DocxError> {
    let mut archive = DocxArchive::from_bytes(template)?;
    let values = PlaceholderMap::from_resume(data);

    let mut replaced = 0;
    let mut unresolved = BTreeSet::new();

    for part in archive.text_parts() {
        let Some(xml) = archive.get(&part) else {
            continue;
        };
        let outcome = substitute::substitute_placeholders(xml, &values)?;
        debug!(part = %part, replaced = outcome.replaced, "Substituted placeholders");
        replaced += outcome.replaced;
        unresolved.extend(outcome.unresolved);
        archive.set(part, outcome.xml);
    }

    let unresolved: Vec<String> = unresolved.into_iter().collect();
    if !unresolved.is_empty() {
        warn!(
            unresolved = ?unresolved,
            "Template placeholders had no value and were left blank"
        );
    }

    Ok(DocxRender {
        bytes: archive.to_bytes()?,
        replaced,
        unresolved,
    })
}
