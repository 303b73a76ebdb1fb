//! The single overwritten output file per document format.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No {0} has been generated yet")]
    NotGenerated(DocumentFormat),

    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "generated_resume.pdf",
            DocumentFormat::Docx => "generated_resume.docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }

    pub fn download_path(&self) -> String {
        format!("/download/{}", self.as_str())
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            other => Err(format!("Unsupported document format '{other}'")),
        }
    }
}

/// Writes rendered documents to fixed paths under one directory.
///
/// Every save replaces the previous file of that format. The new content is written
/// to a temp file in the same directory and renamed over the target, so a download
/// never observes a half-written file.
#[derive(Debug, Clone)]
pub struct OutputStore {
    dir: PathBuf,
}

impl OutputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, format: DocumentFormat) -> PathBuf {
        self.dir.join(format.file_name())
    }

    pub async fn save(&self, format: DocumentFormat, bytes: Vec<u8>) -> Result<PathBuf, StorageError> {
        let dir = self.dir.clone();
        let target = self.path_for(format);
        let len = bytes.len();

        let path = tokio::task::spawn_blocking(move || -> Result<PathBuf, StorageError> {
            std::fs::create_dir_all(&dir)?;
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target).map_err(|e| StorageError::Io(e.error))?;
            Ok(target)
        })
        .await
        .map_err(|e| StorageError::Task(format!("spawn_blocking failed in save: {e}")))??;

        info!(format = %format, path = %path.display(), bytes = len, "Saved generated document");
        Ok(path)
    }

    pub async fn load(&self, format: DocumentFormat) -> Result<Vec<u8>, StorageError> {
        match tokio::fs::read(self.path_for(format)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotGenerated(format))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("pdf".parse::<DocumentFormat>(), Ok(DocumentFormat::Pdf));
        assert_eq!("DOCX".parse::<DocumentFormat>(), Ok(DocumentFormat::Docx));
        assert!("odt".parse::<DocumentFormat>().is_err());
    }

    #[test]
    fn test_fixed_file_names() {
        assert_eq!(DocumentFormat::Pdf.file_name(), "generated_resume.pdf");
        assert_eq!(DocumentFormat::Docx.file_name(), "generated_resume.docx");
        assert_eq!(DocumentFormat::Docx.download_path(), "/download/docx");
    }

    #[tokio::test]
    async fn test_load_before_save_is_not_generated() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path());
        let err = store.load(DocumentFormat::Pdf).await.unwrap_err();
        assert!(matches!(err, StorageError::NotGenerated(DocumentFormat::Pdf)));
    }

    #[tokio::test]
    async fn test_save_overwrites_fixed_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path());

        let first = store.save(DocumentFormat::Pdf, b"first".to_vec()).await.unwrap();
        let second = store.save(DocumentFormat::Pdf, b"second".to_vec()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, dir.path().join("generated_resume.pdf"));
        assert_eq!(store.load(DocumentFormat::Pdf).await.unwrap(), b"second");

        // No temp files left behind.
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_formats_are_stored_independently() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path());
        store.save(DocumentFormat::Pdf, b"pdf".to_vec()).await.unwrap();
        store.save(DocumentFormat::Docx, b"docx".to_vec()).await.unwrap();
        assert_eq!(store.load(DocumentFormat::Pdf).await.unwrap(), b"pdf");
        assert_eq!(store.load(DocumentFormat::Docx).await.unwrap(), b"docx");
    }

    #[tokio::test]
    async fn test_save_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path().join("nested/out"));
        store.save(DocumentFormat::Docx, b"x".to_vec()).await.unwrap();
        assert!(store.path_for(DocumentFormat::Docx).exists());
    }
}
