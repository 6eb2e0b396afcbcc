use log::{debug, warn};

use crate::editing::Patch;
use crate::editing::split::{paragraph_at, paragraph_at_mut, split_run};
use crate::error::{DocumentError, Result};
use crate::indexing::{
    BlockKind, FilteredFragment, FilteredMapping, Fragment, IndexCache, IndexRow, NoiseFilter,
    PositionIndex, RangeRequest, filtered_fragments, filtered_to_raw, locate,
};
use crate::models::{
    BlockItem, Body, BreakType, Emu, HighlightColor, Paragraph, Run, Section, SectionStart,
    Table,
};

/// A document tree plus its lazily built position index.
///
/// The index starts out unbuilt. It is built by [`Document::parse`] or by
/// the first call that needs it, and after that only the blocks touched by a
/// highlight are re-flattened. Structural changes (adding paragraphs, tables
/// or sections, or anything done through [`Document::body_mut`]) drop the
/// index so the next access rebuilds it from scratch.
///
/// ```rust
/// # use docx_highlight_engine::{Document, HighlightColor};
/// let mut doc = Document::new();
/// doc.add_paragraph("Hello world", None);
///
/// doc.highlight([(0, 4)], HighlightColor::Red, false).unwrap();
///
/// let runs = &doc.paragraphs().next().unwrap().runs;
/// assert_eq!(runs[0].text, "Hello");
/// assert_eq!(runs[0].highlight, Some(HighlightColor::Red));
/// assert_eq!(runs[1].text, " world");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub(crate) body: Body,
    pub(crate) noise: NoiseFilter,
    /// `None` until the first parse, and again after structural changes.
    pub(crate) cache: Option<IndexCache>,
    /// Incremented on every mutation.
    pub(crate) version: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_body(body: Body) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }

    pub fn with_noise_filter(mut self, noise: NoiseFilter) -> Self {
        self.noise = noise;
        self
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Mutable access to the tree. Drops the position index.
    pub fn body_mut(&mut self) -> &mut Body {
        self.invalidate();
        &mut self.body
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_parsed(&self) -> bool {
        self.cache.is_some()
    }

    fn invalidate(&mut self) {
        if self.cache.take().is_some() {
            debug!("position index dropped after structural change");
        }
        self.version += 1;
    }

    // ============ Indexing ============

    /// Rebuild the full position index from the current tree.
    pub fn parse(&mut self) -> Result<()> {
        self.cache = Some(IndexCache::build(&self.body)?);
        Ok(())
    }

    /// Build the index if it does not exist yet, otherwise re-flatten any
    /// dirty blocks. Every index read goes through here.
    pub fn ensure_index_current(&mut self) -> Result<&IndexCache> {
        let cache = match self.cache.take() {
            Some(mut cache) => {
                cache.refresh(&self.body)?;
                cache
            }
            None => IndexCache::build(&self.body)?,
        };
        Ok(self.cache.insert(cache))
    }

    pub fn position_index(&mut self) -> Result<&PositionIndex> {
        Ok(self.ensure_index_current()?.index())
    }

    /// Index rows belonging to one block.
    pub fn block_rows(&mut self, block_id: usize) -> Result<&[IndexRow]> {
        Ok(self.position_index()?.block_rows(block_id))
    }

    /// `Paragraph` / `Table` tag of every block, in document order.
    pub fn block_kinds(&mut self) -> Result<Vec<BlockKind>> {
        Ok(self.ensure_index_current()?.block_kinds())
    }

    /// Concatenated text of every run in document order.
    pub fn text(&mut self) -> Result<String> {
        Ok(self.position_index()?.text())
    }

    /// [`Document::text`] with noise characters removed.
    pub fn filtered_text(&mut self) -> Result<String> {
        let text = self.text()?;
        Ok(self.noise.strip(&text))
    }

    /// Filtered → raw offset mapping over the current text.
    pub fn filtered_mapping(&mut self) -> Result<FilteredMapping> {
        let text = self.text()?;
        Ok(FilteredMapping::build(&text, &self.noise))
    }

    /// Index rows with noise stripped; rows left empty are dropped.
    pub fn filtered_fragments(&mut self) -> Result<Vec<FilteredFragment>> {
        self.ensure_index_current()?;
        let Some(cache) = &self.cache else {
            return Ok(Vec::new());
        };
        Ok(filtered_fragments(cache.index(), &self.noise))
    }

    // ============ Highlighting ============

    /// Highlight every range with `color`.
    ///
    /// Ranges are 0-based and inclusive at both ends. With `filter_noise`
    /// they count only non-noise characters and are translated to raw
    /// positions first. Ranges are applied in the order given; a range with
    /// a missing endpoint is skipped, and a range with `end < start` aborts
    /// the call without undoing ranges already applied.
    pub fn highlight<I>(
        &mut self,
        ranges: I,
        color: HighlightColor,
        filter_noise: bool,
    ) -> Result<Patch>
    where
        I: IntoIterator,
        I::Item: Into<RangeRequest>,
    {
        let mapping = if filter_noise {
            Some(self.filtered_mapping()?)
        } else {
            None
        };

        let mut patch = Patch::default();
        for request in ranges.into_iter().map(Into::into) {
            let Some((start, end)) = request.bounds()? else {
                warn!("skipping range with a missing endpoint: {request:?}");
                patch.skipped += 1;
                continue;
            };
            let (raw_start, raw_end) = match &mapping {
                Some(mapping) => filtered_to_raw(mapping, start, end)?,
                None => (start, end),
            };
            let split = self.highlight_raw(raw_start, raw_end, color)?;
            if split > 0 {
                let total = self.position_index()?.total_len();
                patch.changed.push(raw_start..raw_end.saturating_add(1).min(total));
            }
            patch.runs_split += split;
        }

        patch.version = self.version;
        Ok(patch)
    }

    /// Split every run overlapping the raw inclusive range. Returns the
    /// number of runs split.
    fn highlight_raw(
        &mut self,
        raw_start: usize,
        raw_end: usize,
        color: HighlightColor,
    ) -> Result<usize> {
        let targets = locate(self.position_index()?, raw_start, raw_end);
        debug!(
            "highlighting [{raw_start}, {raw_end}] {color}: {} fragment(s)",
            targets.len()
        );

        // Splitting a run pushes later runs of the same paragraph to the
        // right; `shift` tracks that for the targets still to come.
        let mut shift = 0;
        let mut previous: Option<Fragment> = None;
        let mut split = 0;
        for target in targets {
            if target.fragment.char_len() == 0 {
                continue;
            }
            if !previous
                .as_ref()
                .is_some_and(|p| p.same_paragraph(&target.fragment))
            {
                shift = 0;
            }
            let mut fragment = target.fragment;
            fragment.run_id += shift;
            let pieces =
                self.split_run_and_reindex(&fragment, target.rel_start, target.rel_end, color)?;
            shift += pieces - 1;
            split += 1;
            previous = Some(fragment);
        }
        Ok(split)
    }

    /// Split the run `fragment` points at around `rel_start..rel_end`
    /// (fragment-local characters, exclusive end), highlight the middle, and
    /// bring the index back in line with the tree before returning.
    ///
    /// Returns how many runs replaced the original.
    pub fn split_run_and_reindex(
        &mut self,
        fragment: &Fragment,
        rel_start: usize,
        rel_end: usize,
        color: HighlightColor,
    ) -> Result<usize> {
        self.ensure_index_current()?;
        let stale = || DocumentError::StaleFragment {
            block_id: fragment.block_id,
            location: fragment.location,
            run_id: fragment.run_id,
        };

        let paragraph = paragraph_at_mut(&mut self.body, fragment.location).ok_or_else(stale)?;
        let pieces = split_run(paragraph, fragment.run_id, rel_start, rel_end, color)
            .ok_or_else(stale)?;
        self.version += 1;

        if let Some(cache) = self.cache.as_mut() {
            cache.mark_dirty(fragment.block_id);
        }
        self.ensure_index_current()?;
        Ok(pieces)
    }

    /// The run a fragment points at, if the tree still has it.
    pub fn run_at(&self, fragment: &Fragment) -> Option<&Run> {
        paragraph_at(&self.body, fragment.location)?
            .runs
            .get(fragment.run_id)
    }

    // ============ Document-level convenience ============

    /// Append a paragraph holding `text` (as one run) with paragraph style
    /// `style`.
    pub fn add_paragraph(&mut self, text: &str, style: Option<&str>) -> &mut Paragraph {
        self.push_paragraph(Paragraph::with_text(text, style))
    }

    /// Append a heading. Level 0 uses the `Title` style, levels 1-9 use
    /// `Heading {level}`.
    pub fn add_heading(&mut self, text: &str, level: u8) -> Result<&mut Paragraph> {
        if level > 9 {
            return Err(DocumentError::HeadingLevel(level));
        }
        let style = if level == 0 {
            "Title".to_string()
        } else {
            format!("Heading {level}")
        };
        Ok(self.add_paragraph(text, Some(&style)))
    }

    /// Append a paragraph containing only a page break.
    pub fn add_page_break(&mut self) -> &mut Paragraph {
        let mut paragraph = Paragraph::new();
        paragraph.add_run("").add_break(BreakType::Page);
        self.push_paragraph(paragraph)
    }

    /// Append a `rows` × `cols` table whose columns share the block width.
    pub fn add_table(&mut self, rows: usize, cols: usize, style: Option<&str>) -> &mut Table {
        let mut table = Table::new(rows, cols, self.block_width());
        table.style = style.map(str::to_string);
        self.invalidate();
        self.body.items.push(BlockItem::Table(table));
        match self.body.items.last_mut() {
            Some(BlockItem::Table(table)) => table,
            _ => unreachable!("a table was just pushed"),
        }
    }

    /// Close the current section and start a new one with `start_type`.
    /// Returns the new (final) section.
    pub fn add_section(&mut self, start_type: SectionStart) -> &mut Section {
        self.invalidate();
        let closing = self.body.section.clone();
        self.body.items.push(BlockItem::SectionBreak(closing));
        self.body.section.start_type = start_type;
        &mut self.body.section
    }

    fn push_paragraph(&mut self, paragraph: Paragraph) -> &mut Paragraph {
        self.invalidate();
        self.body.items.push(BlockItem::Paragraph(paragraph));
        match self.body.items.last_mut() {
            Some(BlockItem::Paragraph(paragraph)) => paragraph,
            _ => unreachable!("a paragraph was just pushed"),
        }
    }

    /// Remove all content, keeping section properties.
    pub fn clear_content(&mut self) {
        self.invalidate();
        self.body.clear_content();
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.paragraphs()
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.tables()
    }

    pub fn sections(&self) -> Vec<&Section> {
        self.body.sections()
    }

    /// Writing width of the last section.
    pub fn block_width(&self) -> Emu {
        self.body.section.block_width()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        // The index is derived from the body, so it is not compared.
        self.body == other.body && self.noise == other.noise && self.version == other.version
    }
}

impl From<Body> for Document {
    fn from(body: Body) -> Self {
        Self::from_body(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::FragmentLocation;
    use crate::models::TableCell;
    use crate::tests::{body, paragraph, run_texts, table};
    use pretty_assertions::assert_eq;

    fn hello_world() -> Document {
        Document::from_body(body(vec![BlockItem::Paragraph(paragraph(&["Hello world"]))]))
    }

    fn highlighted(doc: &Document, paragraph: usize) -> Vec<(String, Option<HighlightColor>)> {
        doc.paragraphs()
            .nth(paragraph)
            .map(|p| {
                p.runs
                    .iter()
                    .map(|r| (r.text.clone(), r.highlight))
                    .collect()
            })
            .unwrap_or_default()
    }

    // ============ State machine ============

    #[test]
    fn index_is_built_lazily() {
        let mut doc = hello_world();
        assert!(!doc.is_parsed());

        assert_eq!(doc.text().unwrap(), "Hello world");
        assert!(doc.is_parsed());
    }

    #[test]
    fn structural_changes_drop_the_index() {
        let mut doc = hello_world();
        doc.parse().unwrap();

        doc.add_paragraph("more", None);
        assert!(!doc.is_parsed());
        assert_eq!(doc.text().unwrap(), "Hello worldmore");

        doc.body_mut();
        assert!(!doc.is_parsed());
    }

    #[test]
    fn highlight_keeps_document_parsed() {
        let mut doc = hello_world();
        doc.highlight([(0, 4)], HighlightColor::Red, false).unwrap();
        assert!(doc.is_parsed());
    }

    #[test]
    fn reparse_is_idempotent() {
        let mut doc = Document::from_body(body(vec![
            BlockItem::Paragraph(paragraph(&["a", "bc"])),
            BlockItem::Table(table(&[&["d", "ef"]])),
        ]));
        doc.parse().unwrap();
        let first = doc.position_index().unwrap().clone();
        doc.parse().unwrap();
        assert_eq!(doc.position_index().unwrap(), &first);
    }

    // ============ Highlighting ============

    #[test]
    fn highlight_prefix_of_single_run() {
        let mut doc = hello_world();
        let patch = doc.highlight([(0, 4)], HighlightColor::Red, false).unwrap();

        assert_eq!(
            highlighted(&doc, 0),
            vec![
                ("Hello".to_string(), Some(HighlightColor::Red)),
                (" world".to_string(), None),
            ]
        );
        assert_eq!(patch.changed, vec![0..5]);
        assert_eq!(patch.runs_split, 1);
        assert_eq!(doc.text().unwrap(), "Hello world");
    }

    #[test]
    fn highlight_suffix_of_single_run() {
        let mut doc = hello_world();
        doc.highlight([(6, 10)], HighlightColor::Red, false).unwrap();

        assert_eq!(
            highlighted(&doc, 0),
            vec![
                ("Hello ".to_string(), None),
                ("world".to_string(), Some(HighlightColor::Red)),
            ]
        );
    }

    #[test]
    fn highlight_across_runs_of_one_paragraph_tracks_shifted_run_ids() {
        let mut doc = Document::from_body(body(vec![BlockItem::Paragraph(paragraph(&[
            "abc", "def", "ghi",
        ]))]));

        doc.highlight([(1, 7)], HighlightColor::Yellow, false).unwrap();

        assert_eq!(
            run_texts(&doc.paragraphs().next().cloned().unwrap_or_default()),
            vec!["a", "bc", "def", "gh", "i"]
        );
        assert_eq!(
            highlighted(&doc, 0)
                .iter()
                .map(|(_, h)| h.is_some())
                .collect::<Vec<_>>(),
            vec![false, true, true, true, false]
        );
    }

    #[test]
    fn highlight_across_blocks() {
        let mut doc = Document::from_body(body(vec![
            BlockItem::Paragraph(paragraph(&["one"])),
            BlockItem::Table(table(&[&["two"]])),
            BlockItem::Paragraph(paragraph(&["three"])),
        ]));

        doc.highlight([(2, 7)], HighlightColor::Pink, false).unwrap();

        assert_eq!(
            run_texts(&doc.body.paragraphs().next().cloned().unwrap_or_default()),
            vec!["on", "e"]
        );
        assert_eq!(
            run_texts(&doc.body.paragraphs().nth(1).cloned().unwrap_or_default()),
            vec!["th", "ree"]
        );
        let cell_paragraph = doc
            .tables()
            .next()
            .and_then(|t| t.cell(0, 0))
            .and_then(|c| c.paragraphs().next());
        assert_eq!(
            cell_paragraph.map(|p| p.runs[0].highlight),
            Some(Some(HighlightColor::Pink))
        );
        assert_eq!(doc.text().unwrap(), "onetwothree");
    }

    #[test]
    fn highlight_in_table_cell_uses_cell_coordinates() {
        let mut doc = Document::from_body(body(vec![
            BlockItem::Paragraph(paragraph(&[])),
            BlockItem::Table(table(&[&["", "AB"]])),
        ]));

        doc.highlight([(0, 0)], HighlightColor::Blue, false).unwrap();

        let cell = doc.tables().next().and_then(|t| t.cell(0, 1)).cloned();
        let runs: Vec<_> = cell
            .iter()
            .flat_map(TableCell::paragraphs)
            .flat_map(|p| p.runs.iter().map(|r| (r.text.clone(), r.highlight)))
            .collect();
        assert_eq!(
            runs,
            vec![
                ("A".to_string(), Some(HighlightColor::Blue)),
                ("B".to_string(), None),
            ]
        );

        let rows = doc.block_rows(1).unwrap();
        assert_eq!(
            rows[0].fragment.location,
            FragmentLocation::TableCell {
                table_id: 0,
                row_id: 0,
                cell_id: 1,
                paragraph_id: 0
            }
        );
        assert_eq!(rows.len(), 2);

        let first = rows[0].fragment.clone();
        let run = doc.run_at(&first).map(|r| (r.text.as_str(), r.highlight));
        assert_eq!(run, Some(("A", Some(HighlightColor::Blue))));
    }

    #[test]
    fn invalid_range_mutates_nothing() {
        let mut doc = hello_world();
        let before = doc.clone();

        let err = doc
            .highlight([(5, 2)], HighlightColor::Red, false)
            .unwrap_err();

        assert_eq!(err, DocumentError::InvalidRange { start: 5, end: 2 });
        assert_eq!(doc.body(), before.body());
    }

    #[test]
    fn invalid_range_keeps_earlier_ranges_applied() {
        let mut doc = hello_world();
        let result = doc.highlight(
            [RangeRequest::new(0, 1), RangeRequest::new(6, 3)],
            HighlightColor::Red,
            false,
        );

        assert!(result.is_err());
        assert_eq!(highlighted(&doc, 0).len(), 2);
    }

    #[test]
    fn missing_endpoints_are_skipped() {
        let mut doc = hello_world();
        let patch = doc
            .highlight(
                [
                    RangeRequest {
                        start: None,
                        end: Some(3),
                    },
                    RangeRequest::new(6, 10),
                ],
                HighlightColor::Red,
                false,
            )
            .unwrap();

        assert_eq!(patch.skipped, 1);
        assert_eq!(patch.changed, vec![6..11]);
        assert_eq!(highlighted(&doc, 0).len(), 2);
    }

    #[test]
    fn later_ranges_see_earlier_splits() {
        let mut doc = hello_world();
        doc.highlight([(0, 4), (2, 7)], HighlightColor::Red, false)
            .unwrap();

        assert_eq!(
            highlighted(&doc, 0),
            vec![
                ("He".to_string(), None),
                ("llo".to_string(), Some(HighlightColor::Red)),
                (" wo".to_string(), Some(HighlightColor::Red)),
                ("rld".to_string(), None),
            ]
        );
        assert_eq!(doc.text().unwrap(), "Hello world");
    }

    #[test]
    fn range_ending_past_the_text_is_clamped() {
        let mut doc = hello_world();
        let patch = doc
            .highlight([(6, usize::MAX)], HighlightColor::Red, false)
            .unwrap();

        assert_eq!(
            highlighted(&doc, 0),
            vec![
                ("Hello ".to_string(), None),
                ("world".to_string(), Some(HighlightColor::Red)),
            ]
        );
        assert_eq!(patch.changed, vec![6..11]);
        assert_eq!(patch.runs_split, 1);
    }

    #[test]
    fn range_past_the_text_changes_nothing() {
        let mut doc = hello_world();
        let before = doc.body().clone();
        let patch = doc
            .highlight([(40, 50)], HighlightColor::Red, false)
            .unwrap();

        assert_eq!(doc.body(), &before);
        assert!(patch.changed.is_empty());
        assert_eq!(patch.runs_split, 0);
    }

    #[test]
    fn same_range_twice_resplits_but_converges() {
        let mut once = hello_world();
        once.highlight([(0, 4)], HighlightColor::Red, false).unwrap();
        let mut twice = hello_world();
        twice
            .highlight([(0, 4), (0, 4)], HighlightColor::Red, false)
            .unwrap();

        assert_eq!(highlighted(&once, 0), highlighted(&twice, 0));
        assert!(twice.version() > once.version());
    }

    #[test]
    fn zero_length_runs_are_left_alone() {
        let mut p = paragraph(&["ab"]);
        let mut page_break = Run::new("");
        page_break.add_break(BreakType::Page);
        p.runs.push(page_break);
        p.runs.push(Run::new("cd"));
        let mut doc = Document::from_body(body(vec![BlockItem::Paragraph(p)]));

        doc.highlight([(1, 2)], HighlightColor::Red, false).unwrap();

        let p = doc.paragraphs().next().cloned().unwrap_or_default();
        assert_eq!(run_texts(&p), vec!["a", "b", "", "c", "d"]);
        assert_eq!(p.runs[2].break_type, Some(BreakType::Page));
    }

    #[test]
    fn filtered_highlight_translates_positions() {
        let mut doc = Document::from_body(body(vec![BlockItem::Paragraph(paragraph(&[
            "a, b.",
        ]))]))
        .with_noise_filter(NoiseFilter::new([',', '.']));

        assert_eq!(doc.filtered_text().unwrap(), "a b");
        doc.highlight([(2, 2)], HighlightColor::Red, true).unwrap();

        assert_eq!(
            highlighted(&doc, 0),
            vec![
                ("a, ".to_string(), None),
                ("b".to_string(), Some(HighlightColor::Red)),
                (".".to_string(), None),
            ]
        );
    }

    #[test]
    fn filtered_position_past_end_is_an_error() {
        let mut doc = hello_world();
        let err = doc
            .highlight([(0, 10)], HighlightColor::Red, true)
            .unwrap_err();
        assert_eq!(
            err,
            DocumentError::FilteredPositionOutOfRange {
                position: 10,
                len: 10
            }
        );
    }

    // ============ Convenience ============

    #[test]
    fn heading_levels() {
        let mut doc = Document::new();
        assert_eq!(
            doc.add_heading("T", 0).unwrap().style.as_deref(),
            Some("Title")
        );
        assert_eq!(
            doc.add_heading("H", 3).unwrap().style.as_deref(),
            Some("Heading 3")
        );
        assert_eq!(
            doc.add_heading("X", 10).unwrap_err(),
            DocumentError::HeadingLevel(10)
        );
        assert_eq!(doc.paragraphs().count(), 2);
    }

    #[test]
    fn page_break_paragraph_holds_one_empty_run() {
        let mut doc = Document::new();
        let p = doc.add_page_break();
        assert_eq!(p.runs.len(), 1);
        assert_eq!(p.runs[0].break_type, Some(BreakType::Page));
        assert_eq!(doc.position_index().unwrap().len(), 1);
    }

    #[test]
    fn add_table_uses_block_width() {
        let mut doc = Document::new();
        let width = doc.block_width();
        let t = doc.add_table(2, 2, Some("Grid"));
        assert_eq!(t.column_widths, vec![Emu(width.0 / 2); 2]);
        assert_eq!(t.style.as_deref(), Some("Grid"));
        assert_eq!(doc.block_kinds().unwrap(), vec![BlockKind::Table]);
    }

    #[test]
    fn add_section_closes_current_section() {
        let mut doc = Document::new();
        doc.add_paragraph("first", None);
        doc.add_section(SectionStart::Continuous);
        doc.add_paragraph("second", None);

        let sections = doc.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].start_type, SectionStart::NewPage);
        assert_eq!(sections[1].start_type, SectionStart::Continuous);
        assert_eq!(
            doc.block_kinds().unwrap(),
            vec![BlockKind::Paragraph, BlockKind::Paragraph]
        );
    }

    #[test]
    fn clear_content_empties_the_index() {
        let mut doc = hello_world();
        doc.clear_content();
        assert!(doc.position_index().unwrap().is_empty());
        assert_eq!(doc.text().unwrap(), "");
    }
}
