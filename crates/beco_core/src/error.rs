//! Error types for beco_core crate.
//!
//! Every failure the format engine can report is a [`FormatError`]. Bad magic
//! is only produced while constructing a container; bounds failures can come
//! from construction or from a single query/mutation call, and never leave the
//! container in a modified state.

use std::fmt;
use thiserror::Error;

/// Horizontal (`x`, columns) or vertical (`z`, rows) world axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Z => f.write_str("z"),
        }
    }
}

/// The limit that was exceeded by an out-of-bounds access.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// A read or write ending at `end` in a buffer of `len` bytes.
    Bytes { end: usize, len: usize },
    /// A row index outside `0..num_rows`.
    Row { index: u32, num_rows: u32 },
    /// A world coordinate that maps to a negative (or undefined) grid index.
    Coordinate { axis: Axis, value: f64 },
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Bytes { end, len } => {
                write!(f, "byte range ending at {end} exceeds buffer of {len} bytes")
            }
            Bound::Row { index, num_rows } => {
                write!(f, "row {index} is outside a table of {num_rows} rows")
            }
            Bound::Coordinate { axis, value } => {
                write!(f, "{axis} = {value} lies before the grid origin")
            }
        }
    }
}

/// Main error type for beco_core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The first four bytes match neither byte order of the magic.
    #[error("Unknown magic: {}", hex::encode(.found))]
    BadMagic { found: [u8; 4] },

    /// An access outside the buffer, the row table or the coordinate domain.
    #[error("Out of bounds: {0}")]
    OutOfBounds(Bound),

    /// The header declares fewer rows than the clamp and sentinel rows need.
    #[error("Container declares {0} rows, at least 2 are required")]
    TooFewRows(u32),

    /// An encoded quantity does not fit the 32-bit header or offset table.
    #[error("{what} does not fit in 32 bits: {value}")]
    TooLarge { what: &'static str, value: usize },
}

/// Result type alias for beco_core operations.
pub type Result<T> = std::result::Result<T, FormatError>;

impl FormatError {
    /// Creates a byte-range bounds error.
    #[must_use]
    pub fn bytes(end: usize, len: usize) -> Self {
        Self::OutOfBounds(Bound::Bytes { end, len })
    }

    /// Creates a row-index bounds error.
    #[must_use]
    pub fn row(index: u32, num_rows: u32) -> Self {
        Self::OutOfBounds(Bound::Row { index, num_rows })
    }

    /// Creates a coordinate-domain bounds error.
    #[must_use]
    pub fn coordinate(axis: Axis, value: f64) -> Self {
        Self::OutOfBounds(Bound::Coordinate { axis, value })
    }

    /// Returns `true` for any [`FormatError::OutOfBounds`] variant.
    #[must_use]
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds(_))
    }
}
