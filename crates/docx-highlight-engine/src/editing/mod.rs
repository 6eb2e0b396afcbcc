/*!
 * # Highlighting
 *
 * Turns global character ranges into highlighted runs without changing the
 * document's text.
 *
 * ## Flow
 *
 * 1. A `RangeRequest` is validated and, when noise filtering is on,
 *    translated from filtered to raw positions.
 * 2. `locate` finds every index row the raw range overlaps, with the
 *    fragment-local slice to highlight.
 * 3. Each row's live run is found by its tree coordinates and replaced by
 *    head / mid / tail runs; only `mid` gets the new colour.
 * 4. The touched block is marked dirty and re-flattened before the next
 *    lookup, so later ranges in the same call see the split runs.
 *
 * ## Module Structure
 *
 * - **`document`**: `Document`, the tree plus its lazily built index
 * - **`split`**: the run splitter and live-paragraph lookup
 * - **`patch`**: summary of what a `highlight` call changed
 *
 * ## Usage Pattern
 *
 * ```rust
 * use docx_highlight_engine::editing::*;
 * use docx_highlight_engine::HighlightColor;
 *
 * let mut doc = Document::new();
 * doc.add_paragraph("Hello, world.", None);
 *
 * // Filtered positions skip punctuation and whitespace: "Helloworld"
 * let patch = doc.highlight([(5, 9)], HighlightColor::Yellow, true).unwrap();
 * assert_eq!(patch.changed, vec![7..12]);
 * assert_eq!(doc.text().unwrap(), "Hello, world.");
 * ```
 */

pub mod document;
pub mod patch;
pub mod split;

pub use document::Document;
pub use patch::Patch;
pub use split::{SplitPieces, paragraph_at, paragraph_at_mut, split_run};
