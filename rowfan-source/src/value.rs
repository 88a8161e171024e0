//! Owned scalar values read back from per-slot storage cells.
//!
//! A materialized exploded record is one [`Value`] per column per slot. The
//! engine stores cells as owned values rather than views into the column
//! arrays so a slot's storage stays valid independently of how the host
//! interleaves reads with further `set_entry` calls on other slots.

use rowfan_result::{Error, Result};

/// A single materialized cell value.
///
/// Variants mirror the scalar Arrow types the engine supports as inner
/// element types. `Null` covers both null array entries and cells that have
/// not been materialized yet.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Utf8(String),
}

macro_rules! impl_from_for_value {
    ($($variant:ident: $t:ty),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_value!(
    Boolean: bool,
    Int8: i8,
    Int16: i16,
    Int32: i32,
    Int64: i64,
    UInt8: u8,
    UInt16: u16,
    UInt32: u32,
    UInt64: u64,
    Float32: f32,
    Float64: f64,
    Utf8: String,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8(v.to_string())
    }
}

impl Value {
    /// Short name of the contained type, used in mismatch diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "bool",
            Value::Int8(_) => "i8",
            Value::Int16(_) => "i16",
            Value::Int32(_) => "i32",
            Value::Int64(_) => "i64",
            Value::UInt8(_) => "u8",
            Value::UInt16(_) => "u16",
            Value::UInt32(_) => "u32",
            Value::UInt64(_) => "u64",
            Value::Float32(_) => "f32",
            Value::Float64(_) => "f64",
            Value::Utf8(_) => "utf8",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Widening read of any signed integer variant.
    pub fn as_i64(&self) -> Result<i64> {
        match self {
            Value::Int8(v) => Ok(i64::from(*v)),
            Value::Int16(v) => Ok(i64::from(*v)),
            Value::Int32(v) => Ok(i64::from(*v)),
            Value::Int64(v) => Ok(*v),
            other => Err(mismatch("i64", other)),
        }
    }

    /// Widening read of any unsigned integer variant.
    pub fn as_u64(&self) -> Result<u64> {
        match self {
            Value::UInt8(v) => Ok(u64::from(*v)),
            Value::UInt16(v) => Ok(u64::from(*v)),
            Value::UInt32(v) => Ok(u64::from(*v)),
            Value::UInt64(v) => Ok(*v),
            other => Err(mismatch("u64", other)),
        }
    }

    /// Widening read of either float variant.
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Value::Float32(v) => Ok(f64::from(*v)),
            Value::Float64(v) => Ok(*v),
            other => Err(mismatch("f64", other)),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Boolean(v) => Ok(*v),
            other => Err(mismatch("bool", other)),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::Utf8(v) => Ok(v.as_str()),
            other => Err(mismatch("utf8", other)),
        }
    }
}

fn mismatch(expected: &str, got: &Value) -> Error {
    Error::TypeMismatch {
        context: "value".to_string(),
        expected: expected.to_string(),
        actual: got.type_name().to_string(),
    }
}
