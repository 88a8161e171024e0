//! Explosion-index engine: re-exposes nested columns as a flat sequence of
//! exploded records.
//!
//! Given a set of named columns where some hold a collection per row (Arrow
//! `List`/`LargeList`), this crate produces one output record per innermost
//! element, broadcasting scalar columns unchanged. It is consumed by an
//! external iteration engine that drives parallel, slot-based processing
//! over contiguous ranges of record indices.
//!
//! # Architecture
//!
//! - [`shape`]: scalar/nested classification and broadcast-aware element
//!   access over Arrow arrays.
//! - [`thresholds`]: cumulative per-row counts ([`ExplodeIndex`]) mapping
//!   flat record indices back to `(source_row, inner_offset)`.
//! - [`ranges`]: near-equal contiguous partitioning of the flat index space
//!   across worker slots, with a one-shot ownership hand-off.
//! - [`source`]: the host-facing [`ExplodeSource`] plus [`SlotCursor`] for
//!   parallel hosts.
//!
//! All state is immutable after [`ExplodeSource::initialize`]; the engine
//! performs no internal synchronization and relies on disjoint entry ranges
//! plus per-slot private storage for concurrent safety.

#![forbid(unsafe_code)]

pub mod column;
pub mod ranges;
pub mod shape;
pub mod source;
pub mod thresholds;
pub mod value;

pub use column::ExplodeColumn;
pub use ranges::{EntryRange, partition_entry_ranges};
pub use shape::ColumnShape;
pub use source::{ExplodeSource, SlotCursor};
pub use thresholds::ExplodeIndex;
pub use value::Value;

pub use rowfan_result::{Error, Result};
