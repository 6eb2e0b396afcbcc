//! In-memory document tree: body → paragraphs and tables → runs.

pub mod body;
pub mod paragraph;
pub mod run;
pub mod table;

pub use body::{BlockItem, Body, Emu, NodeRef, Section, SectionStart};
pub use paragraph::Paragraph;
pub use run::{BreakType, Font, HighlightColor, Run, Underline, UnknownColor};
pub use table::{Table, TableCell, TableRow};
