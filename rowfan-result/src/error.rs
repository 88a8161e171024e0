use thiserror::Error;

/// Unified error type for all rowfan operations.
///
/// Every failure mode of the explosion engine is represented here, from
/// setup-time shape validation through per-record materialization. Errors
/// propagate upward with the `?` operator; the host protocol receives them as
/// `Result` values and decides whether to abort or report.
///
/// # Thread Safety
///
/// `Error` is `Send + Sync`, so failures can cross slot boundaries when the
/// host runs materialization on worker threads.
#[derive(Error, Debug)]
pub enum Error {
    /// Two nested columns disagree on their number of source rows.
    ///
    /// Raised by the pre-flight length validator before any counting result
    /// is trusted. This is fatal to initialization: the threshold sequence is
    /// only meaningful when every nested column spans the same row range.
    #[error(
        "column \"{left}\" and column \"{right}\" have different lengths: {left_len} and {right_len}"
    )]
    LengthMismatch {
        left: String,
        left_len: usize,
        right: String,
        right_len: usize,
    },

    /// Two nested columns agree on row count but disagree on the number of
    /// inner elements within a row.
    ///
    /// The engine requires per-row element counts to match across nested
    /// columns so that one threshold sequence resolves every column. This is
    /// rejected at initialization rather than left to under-resolve during
    /// materialization.
    #[error(
        "column \"{left}\" and column \"{right}\" disagree at row {row}: {left_len} vs {right_len} elements"
    )]
    ElementCountMismatch {
        left: String,
        left_len: usize,
        right: String,
        right_len: usize,
        row: usize,
    },

    /// The requested column name is not known to the source.
    #[error("the specified column name \"{0}\" is not known to the data source")]
    UnknownColumn(String),

    /// A value was accessed with a type that does not match the column's
    /// declared inner type.
    #[error("type mismatch for {context}: expected {expected}, got {actual}")]
    TypeMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    /// A flat record index, slot id, or inner offset outside the valid range.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: u64, len: u64 },

    /// Entry ranges were requested a second time after the one-shot hand-off.
    ///
    /// The hand-off is guarded by an explicit issued/not-issued state so a
    /// repeat request is distinguishable from a legitimately empty workload.
    #[error("entry ranges have already been handed off to the host")]
    RangesAlreadyConsumed,

    /// Invalid argument or protocol misuse.
    ///
    /// Covers setup-sequence violations (initializing before the slot count
    /// is known, repeating one-shot setup calls, zero slots) and malformed
    /// construction input (duplicate column names, unsupported value types).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Arrow library error during columnar data operations.
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
