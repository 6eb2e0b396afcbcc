// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
use docx_highlight_engine::{Document, HighlightColor};

/// A document alternating multi-run paragraphs and small tables.
#[allow(dead_code)]
pub fn generate_document(sections: usize) -> Document {
    let mut doc = Document::new();
    for section in 0..sections {
        doc.add_heading(&format!("Section {section}"), 1).ok();
        let paragraph = doc.add_paragraph("Paragraph with some content, ", None);
        paragraph.add_run("a bold phrase").font.bold = Some(true);
        paragraph.add_run(" and a closing sentence.");

        let table = doc.add_table(2, 3, None);
        for (row, cells) in table.rows.iter_mut().enumerate() {
            for (col, cell) in cells.cells.iter_mut().enumerate() {
                if let Some(p) = cell.paragraph_mut(0) {
                    p.add_run(format!("cell {row}.{col}"));
                }
            }
        }
    }
    doc
}

/// Evenly spaced ranges covering roughly a tenth of `len` characters each.
#[allow(dead_code)]
pub fn spread_ranges(len: usize, count: usize) -> Vec<(usize, usize)> {
    let step = (len / count.max(1)).max(1);
    let width = (step / 10).max(1);
    (0..count)
        .map(|i| i * step)
        .filter(|start| start + width <= len)
        .map(|start| (start, start + width - 1))
        .collect()
}

#[allow(dead_code)]
pub const COLOR: HighlightColor = HighlightColor::Yellow;
