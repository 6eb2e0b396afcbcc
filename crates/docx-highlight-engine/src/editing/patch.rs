use std::ops::Range;

/// Result of a `highlight` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    /// Raw character ranges (0-based, exclusive end) that were highlighted.
    pub changed: Vec<Range<usize>>,
    /// Number of runs that were split.
    pub runs_split: usize,
    /// Requests skipped because an endpoint was missing.
    pub skipped: usize,
    /// Document version after the call.
    pub version: u64,
}
