use crate::editing::Document;
use crate::models::Body;
use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read a document stored as JSON at `path`.
pub fn load_document(path: &Path) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let body: Body = serde_json::from_str(&content)?;
    Ok(Document::from_body(body))
}

/// Write `document`'s tree as pretty-printed JSON to `path`.
pub fn save_document(document: &Document, path: &Path) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(document.body())?;
    fs::write(path, content)?;
    Ok(())
}

/// Read a document relative to `root`.
pub fn read_document(relative_path: &RelativePath, root: &Path) -> Result<Document, IoError> {
    load_document(&relative_path.to_path(root))
}

/// Write a document relative to `root`.
pub fn write_document(
    relative_path: &RelativePath,
    root: &Path,
    document: &Document,
) -> Result<(), IoError> {
    save_document(document, &relative_path.to_path(root))
}

impl Document {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        load_document(path.as_ref())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        save_document(self, path.as_ref())
    }
}
