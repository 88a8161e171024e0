//! rowfan: explode nested columns into a flat record sequence.
//!
//! This crate is the primary entrypoint for the rowfan toolkit. It re-exports
//! the explosion engine from the underlying `rowfan-*` crates, providing a
//! unified API surface for hosts.
//!
//! # Quick Start
//!
//! Explode a nested column alongside a broadcast scalar:
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Int64Array, ListArray};
//! use arrow::datatypes::Int64Type;
//! use rowfan::ExplodeSource;
//!
//! let i: ArrayRef = Arc::new(Int64Array::from(vec![0, 1, 2]));
//! let v: ArrayRef = Arc::new(ListArray::from_iter_primitive::<Int64Type, _, _>(vec![
//!     Some(vec![Some(9)]),
//!     Some(vec![Some(7), Some(8)]),
//!     Some(vec![Some(5)]),
//! ]));
//!
//! let mut source = ExplodeSource::try_new(vec![
//!     ("i".to_string(), i),
//!     ("v".to_string(), v),
//! ])
//! .unwrap();
//! source.set_slot_count(2).unwrap();
//! source.initialize().unwrap();
//!
//! for range in source.take_entry_ranges().unwrap() {
//!     for flat in range.begin..range.end {
//!         source.set_entry(0, flat).unwrap();
//!         let i = source.slot_value("i", 0).unwrap().as_i64().unwrap();
//!         let v = source.slot_value("v", 0).unwrap().as_i64().unwrap();
//!         println!("{i} {v}");
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! rowfan is organized as a layered workspace:
//!
//! - **Engine** (`rowfan-source`): shape classification, threshold counting,
//!   flat-index resolution, range partitioning, and per-slot materialization.
//! - **Errors** (`rowfan-result`): the unified [`Error`] enum and [`Result`]
//!   alias shared by every crate.

pub use rowfan_result::{Error, Result};
pub use rowfan_source::{
    ColumnShape, EntryRange, ExplodeIndex, ExplodeSource, SlotCursor, Value,
};
