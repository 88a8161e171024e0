//! A named column participating in explosion.

use arrow::array::{Array, ArrayRef};
use arrow::datatypes::DataType;

use rowfan_result::{Error, Result};

use crate::shape::{self, ColumnShape};
use crate::value::Value;

/// One named column plus its classified shape.
///
/// Columns are immutable for the lifetime of the source: the backing array is
/// supplied once at construction and only ever read, which is what makes the
/// lock-free concurrent reads of the materialization phase sound.
#[derive(Debug, Clone)]
pub struct ExplodeColumn {
    name: String,
    array: ArrayRef,
    shape: ColumnShape,
}

impl ExplodeColumn {
    /// Wrap a named array, classifying its shape and rejecting inner element
    /// types the engine cannot materialize.
    pub fn try_new(name: impl Into<String>, array: ArrayRef) -> Result<Self> {
        let name = name.into();
        let inner = shape::inner_type(array.data_type());
        if !shape::is_supported_inner(inner) {
            return Err(Error::InvalidArgument(format!(
                "column \"{name}\" has unsupported inner value type {inner}"
            )));
        }
        let shape = shape::classify(array.data_type());
        Ok(Self { name, array, shape })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> ColumnShape {
        self.shape
    }

    pub fn is_nested(&self) -> bool {
        self.shape == ColumnShape::Nested
    }

    /// The declared (outer) Arrow type.
    pub fn data_type(&self) -> &DataType {
        self.array.data_type()
    }

    /// The exploded (inner) element type exposed to the host.
    pub fn inner_data_type(&self) -> &DataType {
        shape::inner_type(self.array.data_type())
    }

    /// Number of source rows before explosion.
    pub fn num_source_rows(&self) -> usize {
        self.array.len()
    }

    /// Inner elements contributed by one source row.
    pub fn element_count(&self, row: usize) -> Result<usize> {
        shape::element_count(self.array.as_ref(), row)
    }

    /// Element at `(row, offset)`; scalar columns broadcast and ignore
    /// `offset`.
    pub fn value_at(&self, row: usize, offset: usize) -> Result<Value> {
        shape::value_at(self.array.as_ref(), row, offset)
    }
}
