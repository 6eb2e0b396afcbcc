//! # Position Indexing
//!
//! Linearizes the document tree into a table of run fragments with global,
//! 1-based, cumulative character bounds, and resolves global ranges back to
//! the fragments they touch.
//!
//! ```text
//! Body ─ enumerate_blocks ─▶ blocks ─ flatten_block ─▶ fragments
//!                                                         │
//!                         IndexCache ◀── PositionIndex ◀──┘
//!                              │
//!        RangeRequest ─ locate ┴─▶ LocatedFragment (row + local slice)
//! ```
//!
//! - **`noise`**: the punctuation/separator set excluded from filtered counting
//! - **`blocks`**: block enumeration and run flattening
//! - **`fragment`**: one run's text plus its tree coordinates
//! - **`position`**: index rows, cumulative bounds, per-block dirty cache
//! - **`filtered`**: noise-stripped text and filtered → raw offset mapping
//! - **`locate`**: range requests and the overlap search

pub mod blocks;
pub mod filtered;
pub mod fragment;
pub mod locate;
pub mod noise;
pub mod position;

pub use blocks::{BlockHandle, BlockInfo, BlockKind, BlockRef, enumerate_blocks, flatten_block};
pub use filtered::{FilteredChar, FilteredFragment, FilteredMapping, filtered_fragments};
pub use fragment::{Fragment, FragmentLocation};
pub use locate::{LocatedFragment, RangeRequest, filtered_to_raw, locate};
pub use noise::NoiseFilter;
pub use position::{IndexCache, IndexRow, PositionIndex};
