//! Error types and result definitions for the rowfan explosion engine.
//!
//! This crate provides the unified error type ([`Error`]) and result type
//! alias ([`Result<T>`]) used throughout the rowfan crates. All operations
//! that could fail return `Result<T>`, where the error variant carries enough
//! context to diagnose what went wrong without re-running the operation.
//!
//! # Error Philosophy
//!
//! rowfan uses a single error enum rather than crate-specific error types.
//! This approach:
//! - Simplifies error handling across crate boundaries
//! - Allows errors to propagate naturally with the `?` operator
//! - Provides clear error messages for the host iteration protocol
//! - Enables structured error matching for programmatic handling
//!
//! # Error Categories
//!
//! - **Setup validation** ([`Error::LengthMismatch`],
//!   [`Error::ElementCountMismatch`]): column shapes that cannot be exploded
//!   coherently; fatal to initialization, never retried.
//! - **Lookup failures** ([`Error::UnknownColumn`]): a column name the source
//!   was never constructed with.
//! - **Access-type errors** ([`Error::TypeMismatch`]): the host asked for a
//!   value type that does not match a column's declared inner type.
//! - **Index errors** ([`Error::IndexOutOfRange`]): a flat record index or
//!   slot id outside the valid range, surfaced as a defined, recoverable
//!   error rather than an out-of-bounds access.
//! - **Protocol errors** ([`Error::RangesAlreadyConsumed`],
//!   [`Error::InvalidArgument`]): the host drove the setup sequence out of
//!   order or repeated a one-shot operation.
//! - **Columnar format errors** ([`Error::Arrow`]): passthrough for failures
//!   inside the Arrow layer.

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
