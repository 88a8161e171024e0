use crate::error::Error;

/// Result type alias used throughout rowfan.
///
/// A shorthand for `std::result::Result<T, Error>`. All rowfan operations
/// that can fail return this type.
pub type Result<T> = std::result::Result<T, Error>;
