//! Column shape classification and broadcast-aware element access.
//!
//! A column is either *scalar* (one value per source row) or *nested* (a
//! collection of values per source row). Nested columns are represented by
//! the Arrow `List` and `LargeList` layouts, which the engine treats
//! identically. Classification is pure and resolved once at setup; element
//! access goes through [`value_at`], whose broadcasting rule for scalar
//! columns is load-bearing for the whole engine: a scalar column replays its
//! row value unchanged across every exploded record derived from other
//! columns' nested structure.

use arrow::array::{
    Array, BooleanArray, Float32Array, Float64Array, GenericListArray, Int8Array, Int16Array,
    Int32Array, Int64Array, LargeStringArray, OffsetSizeTrait, StringArray, UInt8Array,
    UInt16Array, UInt32Array, UInt64Array,
};
use arrow::datatypes::{ArrowNativeType, DataType};

use rowfan_result::{Error, Result};

use crate::value::Value;

/// Classification of a column's value layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnShape {
    /// One value per source row, broadcast across exploded records.
    Scalar,
    /// A sequence of values per source row, one exploded record per element.
    Nested,
}

/// Classify an Arrow data type as scalar or nested.
pub fn classify(dtype: &DataType) -> ColumnShape {
    match dtype {
        DataType::List(_) | DataType::LargeList(_) => ColumnShape::Nested,
        _ => ColumnShape::Scalar,
    }
}

/// The exploded (inner) element type of a column.
///
/// For nested columns this is the list's child type; scalar columns are
/// their own inner type.
pub fn inner_type(dtype: &DataType) -> &DataType {
    match dtype {
        DataType::List(field) | DataType::LargeList(field) => field.data_type(),
        other => other,
    }
}

/// Whether the engine can materialize cells of this inner element type.
pub fn is_supported_inner(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Boolean
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            | DataType::Utf8
            | DataType::LargeUtf8
    )
}

/// Number of inner elements a row contributes.
///
/// Nested rows report their list length (null rows contribute zero); scalar
/// rows always contribute exactly one.
pub fn element_count(array: &dyn Array, row: usize) -> Result<usize> {
    match array.data_type() {
        DataType::List(_) => list_element_count::<i32>(array, row),
        DataType::LargeList(_) => list_element_count::<i64>(array, row),
        _ => Ok(1),
    }
}

/// Fetch the element at `(row, offset)` with scalar broadcasting.
///
/// For nested columns this indexes into the row's child slice; for scalar
/// columns `offset` is ignored and the row value itself is returned.
pub fn value_at(array: &dyn Array, row: usize, offset: usize) -> Result<Value> {
    match array.data_type() {
        DataType::List(_) => list_value_at::<i32>(array, row, offset),
        DataType::LargeList(_) => list_value_at::<i64>(array, row, offset),
        _ => scalar_value(array, row),
    }
}

fn list_element_count<O: OffsetSizeTrait>(array: &dyn Array, row: usize) -> Result<usize> {
    let list = downcast::<GenericListArray<O>>(array)?;
    check_index(row, list.len())?;
    if list.is_null(row) {
        Ok(0)
    } else {
        Ok(list.value_length(row).as_usize())
    }
}

fn list_value_at<O: OffsetSizeTrait>(array: &dyn Array, row: usize, offset: usize) -> Result<Value> {
    let list = downcast::<GenericListArray<O>>(array)?;
    check_index(row, list.len())?;
    if list.is_null(row) {
        return Err(Error::IndexOutOfRange {
            index: offset as u64,
            len: 0,
        });
    }
    let elements = list.value(row);
    scalar_value(elements.as_ref(), offset)
}

/// Read a single scalar [`Value`] out of a non-nested array.
pub fn scalar_value(array: &dyn Array, index: usize) -> Result<Value> {
    check_index(index, array.len())?;
    if array.is_null(index) {
        return Ok(Value::Null);
    }
    let value = match array.data_type() {
        DataType::Boolean => Value::Boolean(downcast::<BooleanArray>(array)?.value(index)),
        DataType::Int8 => Value::Int8(downcast::<Int8Array>(array)?.value(index)),
        DataType::Int16 => Value::Int16(downcast::<Int16Array>(array)?.value(index)),
        DataType::Int32 => Value::Int32(downcast::<Int32Array>(array)?.value(index)),
        DataType::Int64 => Value::Int64(downcast::<Int64Array>(array)?.value(index)),
        DataType::UInt8 => Value::UInt8(downcast::<UInt8Array>(array)?.value(index)),
        DataType::UInt16 => Value::UInt16(downcast::<UInt16Array>(array)?.value(index)),
        DataType::UInt32 => Value::UInt32(downcast::<UInt32Array>(array)?.value(index)),
        DataType::UInt64 => Value::UInt64(downcast::<UInt64Array>(array)?.value(index)),
        DataType::Float32 => Value::Float32(downcast::<Float32Array>(array)?.value(index)),
        DataType::Float64 => Value::Float64(downcast::<Float64Array>(array)?.value(index)),
        DataType::Utf8 => Value::Utf8(downcast::<StringArray>(array)?.value(index).to_string()),
        DataType::LargeUtf8 => {
            Value::Utf8(downcast::<LargeStringArray>(array)?.value(index).to_string())
        }
        other => {
            return Err(Error::InvalidArgument(format!(
                "unsupported scalar value type {other}"
            )));
        }
    };
    Ok(value)
}

fn downcast<T: Array + 'static>(array: &dyn Array) -> Result<&T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::InvalidArgument(format!(
            "array layout does not match its declared type {}",
            array.data_type()
        ))
    })
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::IndexOutOfRange {
            index: index as u64,
            len: len as u64,
        })
    }
}
