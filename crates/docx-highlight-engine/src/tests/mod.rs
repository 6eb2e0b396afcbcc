use crate::models::{BlockItem, Body, Paragraph, Run, Table, TableCell, TableRow};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for test documents
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test file with content
pub fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}

/// A paragraph with one run per string, empty strings included.
pub fn paragraph(runs: &[&str]) -> Paragraph {
    Paragraph {
        style: None,
        runs: runs.iter().map(|text| Run::new(*text)).collect(),
    }
}

/// A table whose cells each hold a single paragraph with the given text.
pub fn table(rows: &[&[&str]]) -> Table {
    Table {
        style: None,
        column_widths: Vec::new(),
        rows: rows
            .iter()
            .map(|cells| TableRow {
                cells: cells.iter().map(|text| TableCell::with_text(text)).collect(),
            })
            .collect(),
    }
}

pub fn body(items: Vec<BlockItem>) -> Body {
    Body {
        items,
        ..Body::default()
    }
}

pub fn run_texts(paragraph: &Paragraph) -> Vec<String> {
    paragraph.runs.iter().map(|r| r.text.clone()).collect()
}
