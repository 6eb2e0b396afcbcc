use serde::{Deserialize, Serialize};

use super::paragraph::Paragraph;
use super::table::{Table, TableCell};

/// English Metric Units, the length unit used for page geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Emu(pub i64);

impl Emu {
    pub const PER_INCH: i64 = 914_400;

    pub fn from_inches(inches: f64) -> Self {
        Emu((inches * Self::PER_INCH as f64).round() as i64)
    }
}

/// How a section starts relative to the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionStart {
    Continuous,
    NewColumn,
    #[default]
    NewPage,
    EvenPage,
    OddPage,
}

/// Page geometry of a document section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub start_type: SectionStart,
    pub page_width: Emu,
    pub page_height: Emu,
    pub left_margin: Emu,
    pub right_margin: Emu,
}

impl Default for Section {
    /// US Letter with one-inch side margins.
    fn default() -> Self {
        Self {
            start_type: SectionStart::NewPage,
            page_width: Emu::from_inches(8.5),
            page_height: Emu::from_inches(11.0),
            left_margin: Emu::from_inches(1.0),
            right_margin: Emu::from_inches(1.0),
        }
    }
}

impl Section {
    /// Writing width between the side margins.
    pub fn block_width(&self) -> Emu {
        Emu(self.page_width.0 - self.left_margin.0 - self.right_margin.0)
    }
}

/// A child of a document body or table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BlockItem {
    Paragraph(Paragraph),
    Table(Table),
    /// Closes the preceding section and carries its properties.
    SectionBreak(Section),
}

/// The document body: block items followed by the final section's
/// properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Body {
    pub items: Vec<BlockItem>,
    pub section: Section,
}

impl Body {
    /// Remove all content, keeping the final section properties.
    pub fn clear_content(&mut self) {
        self.items.clear();
    }

    /// Top-level paragraphs in document order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.items.iter().filter_map(|item| match item {
            BlockItem::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Top-level tables in document order. Tables nested in cells are not
    /// included.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.items.iter().filter_map(|item| match item {
            BlockItem::Table(t) => Some(t),
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

    pub fn table_mut(&mut self, index: usize) -> Option<&mut Table> {
        self.items
            .iter_mut()
            .filter_map(|item| match item {
                BlockItem::Table(t) => Some(t),
                _ => None,
            })
            .nth(index)
    }

    /// Every section: one per section break, then the final section.
    pub fn sections(&self) -> Vec<&Section> {
        self.items
            .iter()
            .filter_map(|item| match item {
                BlockItem::SectionBreak(s) => Some(s),
                _ => None,
            })
            .chain(std::iter::once(&self.section))
            .collect()
    }
}

/// A borrowed handle to any node the block enumerator may be pointed at.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Body(&'a Body),
    Cell(&'a TableCell),
    Paragraph(&'a Paragraph),
    Table(&'a Table),
}

impl NodeRef<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeRef::Body(_) => "body",
            NodeRef::Cell(_) => "table cell",
            NodeRef::Paragraph(_) => "paragraph",
            NodeRef::Table(_) => "table",
        }
    }
}
