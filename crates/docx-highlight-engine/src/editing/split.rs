//! Replacing one run with head / mid / tail runs so that only `mid` carries a
//! new highlight.

use log::debug;

use crate::indexing::FragmentLocation;
use crate::models::{Body, HighlightColor, Paragraph, Run};

/// The three slices of a run's text around a fragment-local range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPieces {
    pub head: String,
    pub mid: String,
    pub tail: String,
}

impl SplitPieces {
    /// Slice `text` at character offsets `rel_start..rel_end`, clamping both
    /// to the text length.
    pub fn of(text: &str, rel_start: usize, rel_end: usize) -> Self {
        let start = byte_offset(text, rel_start);
        let end = byte_offset(text, rel_end.max(rel_start));
        Self {
            head: text[..start].to_string(),
            mid: text[start..end].to_string(),
            tail: text[end..].to_string(),
        }
    }

    pub fn char_len(&self) -> usize {
        self.head.chars().count() + self.mid.chars().count() + self.tail.chars().count()
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| offset)
}

/// Split the run at `run_id` of `paragraph` around `rel_start..rel_end` and
/// highlight the middle piece.
///
/// The original run is replaced in place by head (if non-empty), mid and
/// tail (if non-empty); every piece keeps the original style and font, only
/// mid carries a highlight, and a break on the original run moves to the last
/// piece. Returns how many runs
/// replaced the original, or `None` if there is no such run.
pub fn split_run(
    paragraph: &mut Paragraph,
    run_id: usize,
    rel_start: usize,
    rel_end: usize,
    color: HighlightColor,
) -> Option<usize> {
    let original = paragraph.runs.get(run_id)?;
    let SplitPieces { head, mid, tail } = SplitPieces::of(&original.text, rel_start, rel_end);

    let mut pieces: Vec<Run> = Vec::with_capacity(3);
    if !head.is_empty() {
        pieces.push(original.with_formatting_of(head));
    }
    let mut highlighted = original.with_formatting_of(mid);
    highlighted.highlight = Some(color);
    pieces.push(highlighted);
    if !tail.is_empty() {
        pieces.push(original.with_formatting_of(tail));
    }
    if let Some(last) = pieces.last_mut() {
        last.break_type = original.break_type;
    }

    let count = pieces.len();
    for (offset, piece) in pieces.into_iter().enumerate() {
        paragraph.insert_run_before(run_id + offset, piece);
    }
    paragraph.delete_run(run_id + count);

    debug!("split run {run_id} into {count} run(s), highlighted {rel_start}..{rel_end} {color}");
    Some(count)
}

/// The paragraph a fragment location points at.
pub fn paragraph_at(body: &Body, location: FragmentLocation) -> Option<&Paragraph> {
    match location {
        FragmentLocation::Paragraph { paragraph_id } => body.paragraphs().nth(paragraph_id),
        FragmentLocation::TableCell {
            table_id,
            row_id,
            cell_id,
            paragraph_id,
        } => body
            .tables()
            .nth(table_id)?
            .cell(row_id, cell_id)?
            .paragraphs()
            .nth(paragraph_id),
    }
}

/// Mutable counterpart of [`paragraph_at`].
///
/// Top-level paragraphs are found by paragraph number; table cells by
/// table → row → cell → paragraph-in-cell.
pub fn paragraph_at_mut(body: &mut Body, location: FragmentLocation) -> Option<&mut Paragraph> {
    match location {
        FragmentLocation::Paragraph { paragraph_id } => body.paragraph_mut(paragraph_id),
        FragmentLocation::TableCell {
            table_id,
            row_id,
            cell_id,
            paragraph_id,
        } => body
            .table_mut(table_id)?
            .cell_mut(row_id, cell_id)?
            .paragraph_mut(paragraph_id),
    }
}
