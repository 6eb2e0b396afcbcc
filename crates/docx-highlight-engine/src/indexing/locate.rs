//! Resolving global character ranges to the index rows they touch.

use std::ops::RangeInclusive;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, Result};
use crate::indexing::filtered::FilteredMapping;
use crate::indexing::fragment::Fragment;
use crate::indexing::position::PositionIndex;

/// A caller-supplied `(start, end)` range, 0-based and inclusive at both
/// ends. A request with a missing endpoint is skipped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeRequest {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl RangeRequest {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Both endpoints, `None` when either is missing.
    ///
    /// Fails with [`DocumentError::InvalidRange`] when `end < start`.
    pub fn bounds(&self) -> Result<Option<(usize, usize)>> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end < start => {
                Err(DocumentError::InvalidRange { start, end })
            }
            (Some(start), Some(end)) => Ok(Some((start, end))),
            _ => Ok(None),
        }
    }
}

impl From<(usize, usize)> for RangeRequest {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

impl From<(Option<usize>, Option<usize>)> for RangeRequest {
    fn from((start, end): (Option<usize>, Option<usize>)) -> Self {
        Self { start, end }
    }
}

impl From<RangeInclusive<usize>> for RangeRequest {
    fn from(range: RangeInclusive<usize>) -> Self {
        Self::new(*range.start(), *range.end())
    }
}

/// An index row touched by a range, with the fragment-local slice
/// `rel_start..rel_end` (character offsets, exclusive end).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocatedFragment {
    pub row: usize,
    pub fragment: Fragment,
    pub rel_start: usize,
    pub rel_end: usize,
}

/// Translate filtered 0-based positions to raw 0-based positions.
pub fn filtered_to_raw(mapping: &FilteredMapping, start: usize, end: usize) -> Result<(usize, usize)> {
    Ok((mapping.raw_index(start)?, mapping.raw_index(end)?))
}

/// Every row overlapping the raw inclusive range `[raw_start, raw_end]`, in
/// ascending row order.
pub fn locate(index: &PositionIndex, raw_start: usize, raw_end: usize) -> Vec<LocatedFragment> {
    let start_num = raw_start.saturating_add(1);
    let end_num = raw_end.saturating_add(1);
    let rows = index.rows();

    // Both bounds are non-decreasing, so the overlapping rows form one run.
    let lo = rows.partition_point(|r| r.last_num < start_num);
    let hi = rows.partition_point(|r| r.first_num <= end_num);

    rows[lo..hi]
        .iter()
        .enumerate()
        .filter(|(_, row)| row.overlaps(start_num, end_num))
        .map(|(offset, row)| {
            let rel_start = start_num.saturating_sub(row.first_num);
            let rel_end = end_num.saturating_sub(row.first_num) + 1;
            trace!(
                "range [{start_num}, {end_num}] touches row {} ({:?}) at {rel_start}..{rel_end}",
                lo + offset,
                row.string()
            );
            LocatedFragment {
                row: lo + offset,
                fragment: row.fragment.clone(),
                rel_start,
                rel_end,
            }
        })
        .collect()
}
