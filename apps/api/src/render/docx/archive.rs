//! DOCX packages are ZIP archives of XML parts.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek, Write};

use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use super::DocxError;

pub const DOCUMENT_PART: &str = "word/document.xml";

/// An unpacked DOCX package, keyed by part path.
#[derive(Debug, Default)]
pub struct DocxArchive {
    parts: HashMap<String, Vec<u8>>,
}

impl DocxArchive {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        Self::from_reader(Cursor::new(bytes))
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, DocxError> {
        let mut archive = ZipArchive::new(reader)?;
        let mut parts = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            // Skip directories
            if name.ends_with('/') {
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            parts.insert(name, contents);
        }

        if !parts.contains_key(DOCUMENT_PART) {
            return Err(DocxError::MissingPart(DOCUMENT_PART.to_string()));
        }
        Ok(Self { parts })
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.parts.get(path).map(|v| v.as_slice())
    }

    pub fn set(&mut self, path: impl Into<String>, contents: Vec<u8>) {
        self.parts.insert(path.into(), contents);
    }

    /// Parts that carry body text: the main document, headers and footers. Sorted.
    pub fn text_parts(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .parts
            .keys()
            .filter(|p| is_text_part(p))
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<(), DocxError> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        // Sorted for deterministic output; Word does not care about entry order.
        let mut paths: Vec<_> = self.parts.keys().collect();
        paths.sort();

        for path in paths {
            zip.start_file(path.as_str(), options)?;
            zip.write_all(&self.parts[path])?;
        }

        zip.finish()?;
        Ok(())
    }
}

fn is_text_part(path: &str) -> bool {
    if path == DOCUMENT_PART {
        return true;
    }
    path.strip_prefix("word/")
        .map(|name| {
            (name.starts_with("header") || name.starts_with("footer"))
                && name.ends_with(".xml")
                && !name.contains('/')
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::docx::template::default_template;

    #[test]
    fn test_default_template_round_trips() {
        let bytes = default_template().unwrap();
        let archive = DocxArchive::from_bytes(&bytes).unwrap();
        assert!(archive.get(DOCUMENT_PART).is_some());
        assert!(archive.get("[Content_Types].xml").is_some());

        let rewritten = archive.to_bytes().unwrap();
        let reopened = DocxArchive::from_bytes(&rewritten).unwrap();
        assert_eq!(reopened.get(DOCUMENT_PART), archive.get(DOCUMENT_PART));
    }

    #[test]
    fn test_missing_document_part_is_rejected() {
        let mut archive = DocxArchive::default();
        archive.set("word/styles.xml", b"<w:styles/>".to_vec());
        let bytes = archive.to_bytes().unwrap();

        let err = DocxArchive::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, DocxError::MissingPart(p) if p == DOCUMENT_PART));
    }

    #[test]
    fn test_garbage_is_not_a_package() {
        let err = DocxArchive::from_bytes(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, DocxError::Archive(_)));
    }

    #[test]
    fn test_text_parts_include_headers_and_footers() {
        let mut archive = DocxArchive::default();
        archive.set(DOCUMENT_PART, Vec::new());
        archive.set("word/header1.xml", Vec::new());
        archive.set("word/footer2.xml", Vec::new());
        archive.set("word/styles.xml", Vec::new());
        archive.set("word/_rels/header1.xml.rels", Vec::new());

        assert_eq!(
            archive.text_parts(),
            vec![DOCUMENT_PART, "word/footer2.xml", "word/header1.xml"]
        );
    }
}
