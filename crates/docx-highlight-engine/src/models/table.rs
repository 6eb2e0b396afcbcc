use serde::{Deserialize, Serialize};

use super::body::{BlockItem, Emu};
use super::paragraph::Paragraph;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    pub style: Option<String>,
    pub column_widths: Vec<Emu>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// A table cell. Like a document body it holds paragraphs and nested tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableCell {
    pub items: Vec<BlockItem>,
}

impl Default for TableCell {
    /// A cell always carries at least one (empty) paragraph.
    fn default() -> Self {
        Self {
            items: vec![BlockItem::Paragraph(Paragraph::new())],
        }
    }
}

impl TableCell {
    pub fn with_text(text: &str) -> Self {
        Self {
            items: vec![BlockItem::Paragraph(Paragraph::with_text(text, None))],
        }
    }

    /// Paragraphs directly inside this cell, in order. Paragraphs of nested
    /// tables are not included.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.items.iter().filter_map(|item| match item {
            BlockItem::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    pub fn paragraph_mut(&mut self, index: usize) -> Option<&mut Paragraph> {
        self.items
            .iter_mut()
            .filter_map(|item| match item {
                BlockItem::Paragraph(p) => Some(p),
                _ => None,
            })
            .nth(index)
    }

    pub fn text(&self) -> String {
        self.paragraphs()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Table {
    /// A `rows` × `cols` grid of empty cells sharing `block_width` evenly.
    pub fn new(rows: usize, cols: usize, block_width: Emu) -> Self {
        let col_width = if cols == 0 {
            Emu(0)
        } else {
            Emu(block_width.0 / cols as i64)
        };
        Self {
            style: None,
            column_widths: vec![col_width; cols],
            rows: (0..rows)
                .map(|_| TableRow {
                    cells: (0..cols).map(|_| TableCell::default()).collect(),
                })
                .collect(),
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row)?.cells.get(col)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row)?.cells.get_mut(col)
    }
}
