//! Noise-stripped views of the position index.

use serde::Serialize;

use crate::error::{DocumentError, Result};
use crate::indexing::fragment::Fragment;
use crate::indexing::noise::NoiseFilter;
use crate::indexing::position::PositionIndex;

/// A retained character and its 0-based index in the raw concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilteredChar {
    pub ch: char,
    pub raw_index: usize,
}

/// Filtered position → raw position lookup table. Always derived from the
/// current raw text, never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilteredMapping {
    rows: Vec<FilteredChar>,
}

impl FilteredMapping {
    pub fn build(raw: &str, filter: &NoiseFilter) -> Self {
        let rows = raw
            .chars()
            .enumerate()
            .filter(|&(_, ch)| !filter.is_noise(ch))
            .map(|(raw_index, ch)| FilteredChar { ch, raw_index })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[FilteredChar] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw 0-based index of the filtered 0-based position `filtered`.
    pub fn raw_index(&self, filtered: usize) -> Result<usize> {
        self.rows
            .get(filtered)
            .map(|row| row.raw_index)
            .ok_or(DocumentError::FilteredPositionOutOfRange {
                position: filtered,
                len: self.rows.len(),
            })
    }

    pub fn text(&self) -> String {
        self.rows.iter().map(|row| row.ch).collect()
    }
}

/// A fragment with its noise stripped, pointing back at its index row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredFragment {
    /// Position of the source row in the full position index.
    pub source_row: usize,
    pub text: String,
    pub fragment: Fragment,
}

/// Every index row with noise removed; rows left empty are dropped.
pub fn filtered_fragments(index: &PositionIndex, filter: &NoiseFilter) -> Vec<FilteredFragment> {
    index
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(source_row, row)| {
            let text = filter.strip(row.string());
            (!text.is_empty()).then(|| FilteredFragment {
                source_row,
                text,
                fragment: row.fragment.clone(),
            })
        })
        .collect()
}
