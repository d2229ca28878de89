#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc
)]
//! # Spatial
//!
//! Per-frame rebuild of the chunk lookup used by the ray marcher.
//!
//! A rebuild runs three stages, each a sequence of compute dispatches:
//!
//! 1.  [`GridIndexer`] appends one `(chunk, primitive)` entry for every chunk
//!     a primitive's bounding sphere overlaps.
//! 2.  [`Sorter`] orders the entries by chunk key with a bitonic network
//!     described by a [`SortPlan`].
//! 3.  [`StartIndexBuilder`] records where each chunk's run begins.
//!
//! [`IndexBuilder`] chains the stages and yields a [`SpatialIndex`].

pub mod builder;
pub mod error;
pub mod index;
pub mod indexer;
pub mod plan;
pub mod sorter;
pub mod start_indices;

pub use builder::{IndexBuilder, RebuildStats};
pub use error::{IndexError, SortError};
pub use index::SpatialIndex;
pub use indexer::{GridIndexer, IndexedEntries};
pub use plan::{SortPlan, SortStep};
pub use sorter::Sorter;
pub use start_indices::StartIndexBuilder;
