//! The host-facing explode source.
//!
//! [`ExplodeSource`] owns the columns, the cached [`ExplodeIndex`], the
//! one-shot entry-range hand-off, and the per-slot output cells. The host
//! iteration protocol drives it through a fixed setup sequence:
//!
//! 1. [`ExplodeSource::try_new`] with `(name, array)` pairs,
//! 2. [`ExplodeSource::set_slot_count`] exactly once,
//! 3. [`ExplodeSource::initialize`] exactly once (validation, counting,
//!    partitioning),
//! 4. [`ExplodeSource::take_entry_ranges`] exactly once,
//! 5. [`ExplodeSource::set_entry`] per `(slot, flat_index)` pair, reading the
//!    result back through [`ExplodeSource::slot_value`].
//!
//! Misordered or repeated setup calls are defined errors, never silent
//! no-ops. For hosts that run slots on worker threads,
//! [`ExplodeSource::take_slot_cursors`] hands out one owned [`SlotCursor`]
//! per slot instead; each cursor shares the immutable core behind an `Arc`
//! and owns its private cells, so slot isolation is enforced by the type
//! system rather than by convention.

use std::fmt;
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::DataType;
use rustc_hash::FxHashMap;

use rowfan_result::{Error, Result};

use crate::column::ExplodeColumn;
use crate::ranges::{EntryRange, RangeHandOff, partition_entry_ranges};
use crate::thresholds::ExplodeIndex;
use crate::value::Value;

/// Immutable column state shared read-only by the source and every cursor.
#[derive(Debug)]
struct SourceCore {
    columns: Vec<ExplodeColumn>,
    by_name: FxHashMap<String, usize>,
}

impl SourceCore {
    fn column_index(&self, name: &str) -> Result<usize> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }
}

/// Pre-flight shape validation.
///
/// All nested columns must agree on their source-row count, and within each
/// row on their element count. Scalar columns are never length-checked
/// against nested ones: they broadcast.
fn validate_columns(columns: &[ExplodeColumn]) -> Result<()> {
    let nested: Vec<&ExplodeColumn> = columns.iter().filter(|c| c.is_nested()).collect();
    let Some((first, rest)) = nested.split_first() else {
        return Ok(());
    };
    for column in rest {
        if column.num_source_rows() != first.num_source_rows() {
            return Err(Error::LengthMismatch {
                left: first.name().to_string(),
                left_len: first.num_source_rows(),
                right: column.name().to_string(),
                right_len: column.num_source_rows(),
            });
        }
    }
    for column in rest {
        for row in 0..first.num_source_rows() {
            let expected = first.element_count(row)?;
            let actual = column.element_count(row)?;
            if expected != actual {
                return Err(Error::ElementCountMismatch {
                    left: first.name().to_string(),
                    left_len: expected,
                    right: column.name().to_string(),
                    right_len: actual,
                    row,
                });
            }
        }
    }
    Ok(())
}

/// Resolve `flat` once, then re-synchronize every column's cell to that
/// exploded record. Scalar columns broadcast their row value; nested columns
/// take the element at the resolved inner offset.
fn materialize_into(
    core: &SourceCore,
    index: &ExplodeIndex,
    flat: u64,
    cells: &mut [Value],
) -> Result<()> {
    let (source_row, inner_offset) = index.resolve(flat)?;
    for (cell, column) in cells.iter_mut().zip(core.columns.iter()) {
        *cell = column.value_at(source_row, inner_offset)?;
    }
    Ok(())
}

/// A data source that re-exposes nested columns as a flat record sequence.
///
/// One output record is produced per innermost element of the nested
/// columns; scalar columns are carried along unchanged (broadcast). See the
/// module docs for the setup sequence.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use arrow::array::{ArrayRef, Int64Array, ListArray};
/// use arrow::datatypes::Int64Type;
/// use rowfan_source::ExplodeSource;
///
/// let i: ArrayRef = Arc::new(Int64Array::from(vec![0, 1, 2]));
/// let v: ArrayRef = Arc::new(ListArray::from_iter_primitive::<Int64Type, _, _>(vec![
///     Some(vec![Some(9)]),
///     Some(vec![Some(7), Some(8)]),
///     Some(vec![Some(5)]),
/// ]));
///
/// let mut source = ExplodeSource::try_new(vec![
///     ("i".to_string(), i),
///     ("v".to_string(), v),
/// ])
/// .unwrap();
/// source.set_slot_count(1).unwrap();
/// source.initialize().unwrap();
///
/// let ranges = source.take_entry_ranges().unwrap();
/// assert_eq!((ranges[0].begin, ranges[0].end), (0, 4));
///
/// source.set_entry(0, 2).unwrap();
/// assert_eq!(source.slot_value("i", 0).unwrap().as_i64().unwrap(), 1);
/// assert_eq!(source.slot_value("v", 0).unwrap().as_i64().unwrap(), 8);
/// ```
#[derive(Debug)]
pub struct ExplodeSource {
    core: Arc<SourceCore>,
    names: Vec<String>,
    n_slots: Option<usize>,
    index: Option<Arc<ExplodeIndex>>,
    ranges: Option<RangeHandOff>,
    slots: Vec<Vec<Value>>,
    cursors_taken: bool,
}

impl ExplodeSource {
    /// Build a source from `(name, array)` pairs in declaration order.
    ///
    /// Duplicate names and unsupported inner value types are rejected here;
    /// shape validation across columns happens at [`initialize`].
    ///
    /// [`initialize`]: ExplodeSource::initialize
    pub fn try_new(columns: Vec<(String, ArrayRef)>) -> Result<Self> {
        let mut wrapped = Vec::with_capacity(columns.len());
        let mut by_name = FxHashMap::default();
        let mut names = Vec::with_capacity(columns.len());
        for (position, (name, array)) in columns.into_iter().enumerate() {
            if by_name.insert(name.clone(), position).is_some() {
                return Err(Error::InvalidArgument(format!(
                    "duplicate column name \"{name}\""
                )));
            }
            wrapped.push(ExplodeColumn::try_new(name.clone(), array)?);
            names.push(name);
        }
        Ok(Self {
            core: Arc::new(SourceCore {
                columns: wrapped,
                by_name,
            }),
            names,
            n_slots: None,
            index: None,
            ranges: None,
            slots: Vec::new(),
            cursors_taken: false,
        })
    }

    /// Column names in declaration order. Idempotent.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.core.by_name.contains_key(name)
    }

    /// The exploded (inner) element type of a column.
    pub fn inner_data_type(&self, name: &str) -> Result<DataType> {
        let idx = self.core.column_index(name)?;
        Ok(self.core.columns[idx].inner_data_type().clone())
    }

    /// Rendered inner type descriptor, used by hosts that compare type names
    /// rather than typed descriptors. Idempotent.
    pub fn value_type_name(&self, name: &str) -> Result<String> {
        Ok(self.inner_data_type(name)?.to_string())
    }

    /// Check a host-requested access type against the column's inner type.
    pub fn check_access_type(&self, name: &str, expected: &DataType) -> Result<()> {
        let actual = self.inner_data_type(name)?;
        if &actual == expected {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                context: format!("column \"{name}\""),
                expected: expected.to_string(),
                actual: actual.to_string(),
            })
        }
    }

    /// Declare the number of worker slots and allocate their private storage
    /// cells, one per column per slot. Must be called exactly once, before
    /// [`initialize`].
    ///
    /// [`initialize`]: ExplodeSource::initialize
    pub fn set_slot_count(&mut self, n_slots: usize) -> Result<()> {
        if n_slots == 0 {
            return Err(Error::InvalidArgument(
                "slot count must be at least 1".to_string(),
            ));
        }
        if self.n_slots.is_some() {
            return Err(Error::InvalidArgument(
                "slot count has already been set".to_string(),
            ));
        }
        if self.index.is_some() {
            return Err(Error::InvalidArgument(
                "slot count must be set before initialization".to_string(),
            ));
        }
        let n_columns = self.core.columns.len();
        self.slots = (0..n_slots)
            .map(|_| vec![Value::Null; n_columns])
            .collect();
        self.n_slots = Some(n_slots);
        Ok(())
    }

    /// Validate column shapes, compute the threshold index, and partition
    /// the flat index space across slots. Must be called exactly once, after
    /// [`set_slot_count`].
    ///
    /// [`set_slot_count`]: ExplodeSource::set_slot_count
    pub fn initialize(&mut self) -> Result<()> {
        let n_slots = self.n_slots.ok_or_else(|| {
            Error::InvalidArgument("initialize called before set_slot_count".to_string())
        })?;
        if self.index.is_some() {
            return Err(Error::InvalidArgument(
                "source has already been initialized".to_string(),
            ));
        }
        validate_columns(&self.core.columns)?;
        let index = ExplodeIndex::build(&self.core.columns)?;
        self.ranges = Some(RangeHandOff::new(partition_entry_ranges(
            index.total_records(),
            n_slots,
        )));
        self.index = Some(Arc::new(index));
        Ok(())
    }

    /// Total number of exploded records, available after initialization.
    pub fn total_records(&self) -> Option<u64> {
        self.index.as_ref().map(|index| index.total_records())
    }

    /// Human-readable label for the host's diagnostics.
    pub fn label(&self) -> &'static str {
        "ExplodedDS"
    }

    /// One-shot hand-off of the per-slot entry ranges.
    ///
    /// The first call transfers ownership of the ranges to the host; a
    /// second call is [`Error::RangesAlreadyConsumed`].
    pub fn take_entry_ranges(&mut self) -> Result<Vec<EntryRange>> {
        let hand_off = self.ranges.as_mut().ok_or_else(|| {
            Error::InvalidArgument("entry ranges requested before initialization".to_string())
        })?;
        hand_off.take()
    }

    /// Materialize the exploded record at `flat` into `slot`'s private cells.
    ///
    /// Every column is re-synchronized to the same logical record: nested
    /// columns contribute the element at the resolved inner offset, scalar
    /// columns broadcast their source-row value.
    pub fn set_entry(&mut self, slot: usize, flat: u64) -> Result<bool> {
        let index = self.index.as_ref().ok_or_else(|| {
            Error::InvalidArgument("set_entry called before initialization".to_string())
        })?;
        if self.cursors_taken {
            return Err(Error::InvalidArgument(
                "slot storage has been handed off to slot cursors".to_string(),
            ));
        }
        let cells = self.slots.get_mut(slot).ok_or(Error::IndexOutOfRange {
            index: slot as u64,
            len: self.n_slots.unwrap_or(0) as u64,
        })?;
        materialize_into(&self.core, index, flat, cells)?;
        Ok(true)
    }

    /// Read the value most recently materialized into `(column, slot)`.
    pub fn slot_value(&self, name: &str, slot: usize) -> Result<&Value> {
        if self.cursors_taken {
            return Err(Error::InvalidArgument(
                "slot storage has been handed off to slot cursors".to_string(),
            ));
        }
        let column = self.core.column_index(name)?;
        let cells = self.slots.get(slot).ok_or(Error::IndexOutOfRange {
            index: slot as u64,
            len: self.n_slots.unwrap_or(0) as u64,
        })?;
        Ok(&cells[column])
    }

    /// Hand out one owned [`SlotCursor`] per slot for parallel hosts.
    ///
    /// One-shot, like [`take_entry_ranges`]: the cursors take ownership of
    /// the per-slot cells, and the in-place `set_entry`/`slot_value` surface
    /// on the source becomes unavailable afterwards. Call only after
    /// [`initialize`] and before any materialization.
    ///
    /// [`take_entry_ranges`]: ExplodeSource::take_entry_ranges
    /// [`initialize`]: ExplodeSource::initialize
    pub fn take_slot_cursors(&mut self) -> Result<Vec<SlotCursor>> {
        let index = self.index.clone().ok_or_else(|| {
            Error::InvalidArgument("slot cursors requested before initialization".to_string())
        })?;
        if self.cursors_taken {
            return Err(Error::InvalidArgument(
                "slot cursors have already been taken".to_string(),
            ));
        }
        self.cursors_taken = true;
        let slots = std::mem::take(&mut self.slots);
        Ok(slots
            .into_iter()
            .enumerate()
            .map(|(slot, cells)| SlotCursor {
                core: Arc::clone(&self.core),
                index: Arc::clone(&index),
                slot,
                cells,
            })
            .collect())
    }
}

impl fmt::Display for ExplodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "explode data source")
    }
}

/// One worker slot's private execution context.
///
/// Shares the immutable columns and threshold index behind `Arc`s and owns
/// its output cells outright, so cursors for different slots can run on
/// different threads without any synchronization.
#[derive(Debug)]
pub struct SlotCursor {
    core: Arc<SourceCore>,
    index: Arc<ExplodeIndex>,
    slot: usize,
    cells: Vec<Value>,
}

impl SlotCursor {
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Materialize the exploded record at `flat` into this cursor's cells.
    pub fn set_entry(&mut self, flat: u64) -> Result<bool> {
        materialize_into(&self.core, &self.index, flat, &mut self.cells)?;
        Ok(true)
    }

    /// Read the most recently materialized value for a column by name.
    pub fn value(&self, name: &str) -> Result<&Value> {
        let column = self.core.column_index(name)?;
        Ok(&self.cells[column])
    }

    /// Read by column position (declaration order).
    pub fn value_at(&self, column: usize) -> Result<&Value> {
        self.cells.get(column).ok_or(Error::IndexOutOfRange {
            index: column as u64,
            len: self.cells.len() as u64,
        })
    }
}
