//! Template loading, with a built-in fallback package.

use std::path::PathBuf;

use tracing::{info, warn};

use super::archive::{DocxArchive, DOCUMENT_PART};
use super::DocxError;

/// Where DOCX renders get their template from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    File(PathBuf),
    Builtin,
}

impl TemplateSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => TemplateSource::File(path),
            None => TemplateSource::Builtin,
        }
    }

    /// Reads the template bytes. Read on every call so template edits apply without
    /// a restart. A configured file that does not exist falls back to the built-in one.
    pub async fn load(&self) -> Result<Vec<u8>, DocxError> {
        match self {
            TemplateSource::Builtin => default_template(),
            TemplateSource::File(path) => match tokio::fs::read(path).await {
                Ok(bytes) => {
                    info!(path = %path.display(), bytes = bytes.len(), "Loaded DOCX template");
                    Ok(bytes)
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!(
                        path = %path.display(),
                        "DOCX template not found, using built-in template"
                    );
                    default_template()
                }
                Err(e) => Err(DocxError::Io(e)),
            },
        }
    }
}

/// Builds the built-in résumé template. Every placeholder it uses is always
/// supplied by `PlaceholderMap::from_resume`.
pub fn default_template() -> Result<Vec<u8>, DocxError> {
    let mut archive = DocxArchive::default();
    archive.set("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec());
    archive.set("_rels/.rels", PACKAGE_RELS.as_bytes().to_vec());
    archive.set(
        "word/_rels/document.xml.rels",
        DOCUMENT_RELS.as_bytes().to_vec(),
    );
    archive.set("word/styles.xml", STYLES.as_bytes().to_vec());
    archive.set(DOCUMENT_PART, document_xml().into_bytes());
    archive.to_bytes()
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults>
    <w:rPrDefault><w:rPr><w:rFonts w:ascii="Helvetica" w:hAnsi="Helvetica"/><w:sz w:val="22"/></w:rPr></w:rPrDefault>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:before="240" w:after="60"/></w:pPr><w:rPr><w:b/><w:sz w:val="24"/></w:rPr></w:style>
  <w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/></w:style>
</w:styles>"#;

fn paragraph(style: Option<&str>, text: &str) -> String {
    let props = style
        .map(|s| format!(r#"<w:pPr><w:pStyle w:val="{s}"/></w:pPr>"#))
        .unwrap_or_default();
    format!(r#"<w:p>{props}<w:r><w:t>{text}</w:t></w:r></w:p>"#)
}

fn section(label: &str, placeholder: &str) -> String {
    format!(
        "{}{}",
        paragraph(Some("Heading1"), label),
        paragraph(None, placeholder)
    )
}

fn table_row(label: &str, placeholder: &str) -> String {
    format!(
        r#"<w:tr><w:tc><w:tcPr><w:tcW w:w="2400" w:type="dxa"/></w:tcPr>{}</w:tc><w:tc><w:tcPr><w:tcW w:w="6960" w:type="dxa"/></w:tcPr>{}</w:tc></w:tr>"#,
        paragraph(None, label),
        paragraph(None, placeholder)
    )
}

fn document_xml() -> String {
    let body = [
        paragraph(Some("Title"), "{{heading}}"),
        paragraph(None, "{{contact}}"),
        section("Summary", "{{summary}}"),
        format!(
            r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="9360" w:type="dxa"/></w:tblPr><w:tblGrid><w:gridCol w:w="2400"/><w:gridCol w:w="6960"/></w:tblGrid>{}</w:tbl>"#,
            table_row("Skills", "{{skills}}")
        ),
        section("Experience", "{{experience}}"),
        section("Projects", "{{projects}}"),
        section("Education", "{{education}}"),
        section("Key Responsibilities", "{{responsibilities}}"),
    ]
    .concat();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#
    )
}
