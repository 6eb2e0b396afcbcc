//! Block enumeration and run flattening.
//!
//! A document body (or a table cell) is walked in document order; every
//! paragraph and table becomes a block, and every run inside a block becomes
//! a [`Fragment`].

use serde::Serialize;

use crate::error::{DocumentError, Result};
use crate::indexing::fragment::{Fragment, FragmentLocation};
use crate::models::{BlockItem, NodeRef, Paragraph, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Paragraph,
    Table,
}

/// Owned coordinates of a block, enough to find it again in its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// 0-based position among the container's blocks.
    pub block_id: usize,
    /// Index into the container's item list (section breaks included).
    pub item_index: usize,
    /// 0-based position among blocks of the same kind.
    pub ordinal: usize,
    pub kind: BlockKind,
}

#[derive(Debug, Clone, Copy)]
pub enum BlockRef<'a> {
    Paragraph(&'a Paragraph),
    Table(&'a Table),
}

impl<'a> BlockRef<'a> {
    pub fn from_item(item: &'a BlockItem) -> Option<Self> {
        match item {
            BlockItem::Paragraph(p) => Some(BlockRef::Paragraph(p)),
            BlockItem::Table(t) => Some(BlockRef::Table(t)),
            BlockItem::SectionBreak(_) => None,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            BlockRef::Paragraph(_) => BlockKind::Paragraph,
            BlockRef::Table(_) => BlockKind::Table,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BlockHandle<'a> {
    pub info: BlockInfo,
    pub node: BlockRef<'a>,
}

/// List the paragraphs and tables directly under `root`, in document order.
///
/// Only a document body or a table cell can be enumerated; anything else is
/// rejected with [`DocumentError::UnrecognizedRoot`].
pub fn enumerate_blocks(root: NodeRef<'_>) -> Result<Vec<BlockHandle<'_>>> {
    let items = match root {
        NodeRef::Body(body) => &body.items,
        NodeRef::Cell(cell) => &cell.items,
        other => return Err(DocumentError::UnrecognizedRoot(other.kind_name())),
    };

    let mut paragraphs = 0;
    let mut tables = 0;
    let mut blocks = Vec::new();

    for (item_index, item) in items.iter().enumerate() {
        let Some(node) = BlockRef::from_item(item) else {
            continue;
        };
        let ordinal = match node.kind() {
            BlockKind::Paragraph => {
                paragraphs += 1;
                paragraphs - 1
            }
            BlockKind::Table => {
                tables += 1;
                tables - 1
            }
        };
        blocks.push(BlockHandle {
            info: BlockInfo {
                block_id: blocks.len(),
                item_index,
                ordinal,
                kind: node.kind(),
            },
            node,
        });
    }

    Ok(blocks)
}

/// Flatten one block into its run fragments.
///
/// Tables are walked rows → cells → paragraphs → runs. Paragraphs without
/// runs contribute nothing; a run with empty text still yields a
/// zero-length fragment.
pub fn flatten_block(info: BlockInfo, node: BlockRef<'_>) -> Vec<Fragment> {
    let mut out = Vec::new();
    match node {
        BlockRef::Paragraph(paragraph) => push_runs(
            &mut out,
            info.block_id,
            FragmentLocation::Paragraph {
                paragraph_id: info.ordinal,
            },
            paragraph,
        ),
        BlockRef::Table(table) => {
            for (row_id, row) in table.rows.iter().enumerate() {
                for (cell_id, cell) in row.cells.iter().enumerate() {
                    for (paragraph_id, paragraph) in cell.paragraphs().enumerate() {
                        let location = FragmentLocation::TableCell {
                            table_id: info.ordinal,
                            row_id,
                            cell_id,
                            paragraph_id,
                        };
                        push_runs(&mut out, info.block_id, location, paragraph);
                    }
                }
            }
        }
    }
    out
}

fn push_runs(
    out: &mut Vec<Fragment>,
    block_id: usize,
    location: FragmentLocation,
    paragraph: &Paragraph,
) {
    out.extend(
        paragraph
            .runs
            .iter()
            .enumerate()
            .map(|(run_id, run)| Fragment {
                text: run.text.clone(),
                block_id,
                location,
                run_id,
            }),
    );
}
