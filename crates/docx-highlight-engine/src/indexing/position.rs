//! The position index: cumulative 1-based character bounds over every
//! fragment of the document, plus the per-block cache that keeps it current
//! after run splits.

use log::debug;
use serde::Serialize;

use crate::error::{DocumentError, Result};
use crate::indexing::blocks::{BlockInfo, BlockKind, BlockRef, enumerate_blocks, flatten_block};
use crate::indexing::fragment::Fragment;
use crate::models::{Body, NodeRef};

/// One row of the position index.
///
/// `first_num` is 1 + the total length of all preceding rows and `last_num`
/// the total length through this row, so a zero-length row has
/// `first_num == last_num + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexRow {
    pub fragment: Fragment,
    pub len_string: usize,
    pub first_num: usize,
    pub last_num: usize,
}

impl IndexRow {
    pub fn string(&self) -> &str {
        &self.fragment.text
    }

    /// Closed-interval overlap with `[start_num, end_num]` (1-based).
    pub fn overlaps(&self, start_num: usize, end_num: usize) -> bool {
        start_num <= self.last_num && end_num >= self.first_num
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PositionIndex {
    rows: Vec<IndexRow>,
}

impl PositionIndex {
    pub fn from_fragments(fragments: impl IntoIterator<Item = Fragment>) -> Self {
        let mut cumulative = 0;
        let rows = fragments
            .into_iter()
            .map(|fragment| {
                let len_string = fragment.char_len();
                let first_num = cumulative + 1;
                cumulative += len_string;
                IndexRow {
                    fragment,
                    len_string,
                    first_num,
                    last_num: cumulative,
                }
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[IndexRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows of one block. Fragments of a block are contiguous, so this is a
    /// slice of the full table.
    pub fn block_rows(&self, block_id: usize) -> &[IndexRow] {
        let start = self
            .rows
            .partition_point(|r| r.fragment.block_id < block_id);
        let end = self
            .rows
            .partition_point(|r| r.fragment.block_id <= block_id);
        &self.rows[start..end]
    }

    /// Total number of characters across all rows.
    pub fn total_len(&self) -> usize {
        self.rows.last().map_or(0, |r| r.last_num)
    }

    /// Concatenation of every fragment's text in document order.
    pub fn text(&self) -> String {
        self.rows.iter().map(IndexRow::string).collect()
    }
}

#[derive(Debug, Clone)]
struct BlockEntry {
    info: BlockInfo,
    fragments: Vec<Fragment>,
    dirty: bool,
}

/// Flattened fragments per block plus the derived [`PositionIndex`].
///
/// Blocks are re-flattened only when marked dirty; bounds are always
/// recomputed for the whole table because they depend on every preceding
/// row.
#[derive(Debug, Clone)]
pub struct IndexCache {
    blocks: Vec<BlockEntry>,
    index: PositionIndex,
}

impl IndexCache {
    /// Full walk of `body`.
    pub fn build(body: &Body) -> Result<Self> {
        let blocks: Vec<BlockEntry> = enumerate_blocks(NodeRef::Body(body))?
            .into_iter()
            .map(|handle| BlockEntry {
                info: handle.info,
                fragments: flatten_block(handle.info, handle.node),
                dirty: false,
            })
            .collect();
        let index = Self::assemble(&blocks);
        debug!(
            "built position index: {} blocks, {} rows, {} characters",
            blocks.len(),
            index.len(),
            index.total_len()
        );
        Ok(Self { blocks, index })
    }

    pub fn index(&self) -> &PositionIndex {
        &self.index
    }

    pub fn block_kinds(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(|b| b.info.kind).collect()
    }

    pub fn mark_dirty(&mut self, block_id: usize) {
        if let Some(entry) = self.blocks.get_mut(block_id) {
            entry.dirty = true;
        }
    }

    pub fn has_dirty_blocks(&self) -> bool {
        self.blocks.iter().any(|b| b.dirty)
    }

    /// Re-flatten every dirty block from `body` and rebuild the bounds.
    /// Returns how many blocks were re-flattened.
    pub fn refresh(&mut self, body: &Body) -> Result<usize> {
        let mut refreshed = 0;
        for entry in self.blocks.iter_mut().filter(|b| b.dirty) {
            let node = body
                .items
                .get(entry.info.item_index)
                .and_then(BlockRef::from_item)
                .filter(|node| node.kind() == entry.info.kind)
                .ok_or(DocumentError::StaleBlock(entry.info.block_id))?;
            entry.fragments = flatten_block(entry.info, node);
            entry.dirty = false;
            refreshed += 1;
        }
        if refreshed > 0 {
            self.index = Self::assemble(&self.blocks);
            debug!(
                "re-flattened {refreshed} block(s); index now has {} rows",
                self.index.len()
            );
        }
        Ok(refreshed)
    }

    fn assemble(blocks: &[BlockEntry]) -> PositionIndex {
        PositionIndex::from_fragments(blocks.iter().flat_map(|b| b.fragments.iter().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockItem, Run};
    use crate::tests::{body, paragraph, table};
    use pretty_assertions::assert_eq;

    fn bounds(index: &PositionIndex) -> Vec<(usize, usize)> {
        index.rows().iter().map(|r| (r.first_num, r.last_num)).collect()
    }

    #[test]
    fn bounds_are_cumulative_and_one_based() {
        let index = IndexCache::build(&body(vec![
            BlockItem::Paragraph(paragraph(&["Hello", " world"])),
            BlockItem::Paragraph(paragraph(&["!"])),
        ]))
        .unwrap();

        assert_eq!(bounds(index.index()), vec![(1, 5), (6, 11), (12, 12)]);
        assert_eq!(index.index().total_len(), 12);
        assert_eq!(index.index().text(), "Hello world!");
    }

    #[test]
    fn zero_length_row_sits_between_neighbours() {
        let mut p = paragraph(&["ab"]);
        p.runs.push(Run::new(""));
        p.runs.push(Run::new("c"));
        let cache = IndexCache::build(&body(vec![BlockItem::Paragraph(p)])).unwrap();

        assert_eq!(bounds(cache.index()), vec![(1, 2), (3, 2), (3, 3)]);
    }

    #[test]
    fn rows_are_contiguous() {
        let cache = IndexCache::build(&body(vec![
            BlockItem::Paragraph(paragraph(&["one", "", "two"])),
            BlockItem::Table(table(&[&["a", "bc"], &["", "def"]])),
            BlockItem::Paragraph(paragraph(&["tail"])),
        ]))
        .unwrap();

        let rows = cache.index().rows();
        assert_eq!(rows[0].first_num, 1);
        for pair in rows.windows(2) {
            assert_eq!(pair[0].last_num + 1, pair[1].first_num);
        }
    }

    #[test]
    fn block_rows_slices_one_block() {
        let cache = IndexCache::build(&body(vec![
            BlockItem::Paragraph(paragraph(&["x"])),
            BlockItem::Table(table(&[&["a", "b"]])),
            BlockItem::Paragraph(paragraph(&["y", "z"])),
        ]))
        .unwrap();

        let strings: Vec<_> = cache
            .index()
            .block_rows(1)
            .iter()
            .map(IndexRow::string)
            .collect();
        assert_eq!(strings, vec!["a", "b"]);
        assert!(cache.index().block_rows(7).is_empty());
    }

    #[test]
    fn refresh_reflattens_only_dirty_blocks_and_shifts_later_bounds() {
        let mut doc_body = body(vec![
            BlockItem::Paragraph(paragraph(&["ab"])),
            BlockItem::Paragraph(paragraph(&["cd"])),
        ]);
        let mut cache = IndexCache::build(&doc_body).unwrap();

        if let BlockItem::Paragraph(p) = &mut doc_body.items[0] {
            p.runs[0].text = "a".into();
            p.runs.push(Run::new("bX"));
        }
        cache.mark_dirty(0);
        assert!(cache.has_dirty_blocks());

        assert_eq!(cache.refresh(&doc_body).unwrap(), 1);
        assert!(!cache.has_dirty_blocks());
        assert_eq!(bounds(cache.index()), vec![(1, 1), (2, 3), (4, 5)]);
        assert_eq!(cache.refresh(&doc_body).unwrap(), 0);
    }

    #[test]
    fn refresh_reports_vanished_block() {
        let mut doc_body = body(vec![BlockItem::Paragraph(paragraph(&["ab"]))]);
        let mut cache = IndexCache::build(&doc_body).unwrap();
        doc_body.items.clear();
        cache.mark_dirty(0);

        assert_eq!(
            cache.refresh(&doc_body).unwrap_err(),
            DocumentError::StaleBlock(0)
        );
    }
}
