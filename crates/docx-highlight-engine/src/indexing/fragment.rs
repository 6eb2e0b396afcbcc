use serde::Serialize;

/// Where a fragment's run lives in the document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FragmentLocation {
    /// A run of a top-level paragraph. `paragraph_id` counts top-level
    /// paragraphs only.
    Paragraph { paragraph_id: usize },
    /// A run of a paragraph inside a table cell. `table_id` counts top-level
    /// tables; `paragraph_id` is local to the cell.
    TableCell {
        table_id: usize,
        row_id: usize,
        cell_id: usize,
        paragraph_id: usize,
    },
}

/// The literal text of one run plus its structural coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub text: String,
    pub block_id: usize,
    pub location: FragmentLocation,
    /// Index of the run within its paragraph.
    pub run_id: usize,
}

impl Fragment {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// True when both fragments belong to the same paragraph.
    pub fn same_paragraph(&self, other: &Fragment) -> bool {
        self.block_id == other.block_id && self.location == other.location
    }
}
