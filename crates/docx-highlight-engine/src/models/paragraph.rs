use serde::{Deserialize, Serialize};

use super::run::Run;

/// A paragraph: an ordered list of runs plus an optional paragraph style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paragraph {
    pub style: Option<String>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A paragraph holding a single run with `text`, or no runs when `text`
    /// is empty.
    pub fn with_text(text: &str, style: Option<&str>) -> Self {
        let mut paragraph = Self {
            style: style.map(str::to_string),
            runs: Vec::new(),
        };
        if !text.is_empty() {
            paragraph.add_run(text);
        }
        paragraph
    }

    pub fn add_run(&mut self, text: impl Into<String>) -> &mut Run {
        let index = self.runs.len();
        self.runs.push(Run::new(text));
        &mut self.runs[index]
    }

    /// Insert `run` immediately before the run at `index`.
    pub fn insert_run_before(&mut self, index: usize, run: Run) {
        self.runs.insert(index, run);
    }

    /// Remove the run at `index`, returning it if it existed.
    pub fn delete_run(&mut self, index: usize) -> Option<Run> {
        (index < self.runs.len()).then(|| self.runs.remove(index))
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}
