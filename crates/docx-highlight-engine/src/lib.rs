pub mod editing;
pub mod error;
pub mod indexing;
pub mod io;
pub mod models;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{Document, Patch};
pub use error::{DocumentError, Result};
pub use indexing::{BlockKind, FragmentLocation, IndexRow, NoiseFilter, RangeRequest};
pub use io::*;
pub use models::*;
