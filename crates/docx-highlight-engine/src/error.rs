use crate::indexing::FragmentLocation;

/// Caller-contract violations raised by indexing and highlighting.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("end position <{end}> should not be smaller than start position <{start}>")]
    InvalidRange { start: usize, end: usize },

    #[error("cannot enumerate blocks of a {0}: expected a document body or a table cell")]
    UnrecognizedRoot(&'static str),

    #[error("heading level must be in range 0-9, got {0}")]
    HeadingLevel(u8),

    #[error("filtered position {position} is out of range (filtered text has {len} characters)")]
    FilteredPositionOutOfRange { position: usize, len: usize },

    #[error("block {0} no longer exists in the document")]
    StaleBlock(usize),

    #[error("no run at {location:?} run {run_id} in block {block_id}")]
    StaleFragment {
        block_id: usize,
        location: FragmentLocation,
        run_id: usize,
    },
}

pub type Result<T, E = DocumentError> = std::result::Result<T, E>;
