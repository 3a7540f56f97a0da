//! Error types for packing runs.
//!
//! Validation happens before any shelf is opened, so an error always means
//! that nothing was placed.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    #[error("bin width must be positive, got {width}")]
    InvalidBinWidth { width: i64 },

    /// Item `index` refers to the position in the input list.
    #[error("item {index}: dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { index: usize, width: i64, height: i64 },

    #[error("item {index}: quantity must not be negative, got {quantity}")]
    NegativeQuantity { index: usize, quantity: i64 },

    /// Raised under [`crate::OverflowPolicy::Reject`].
    #[error("item {index}: width {width} exceeds bin width {bin_width}")]
    Oversized {
        index: usize,
        width: u64,
        bin_width: u64,
    },

    /// The stacked heights of all items do not fit in a `u64`.
    #[error("total height of all items exceeds {}", u64::MAX)]
    TooLarge,
}

pub type Result<T> = std::result::Result<T, PackError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("bin width must be positive")]
    InvalidBinWidth,

    #[error("invalid height range {min}..={max}")]
    InvalidHeightRange { min: u64, max: u64 },

    #[error("cannot create {requested} distinct types, only {possible} exist")]
    TooManyTypes { requested: u64, possible: u64 },

    #[error("seed item {index}: {reason}")]
    InvalidSeed { index: usize, reason: String },

    #[error("cannot reach {requested} rectangles, at least {minimum} are needed")]
    CountTooSmall { requested: u64, minimum: u64 },

    #[error("no rectangle types to distribute the count over")]
    NothingToFill,

    #[error("value {0} is out of range")]
    OutOfRange(u64),
}
