//! # Beco IO
//!
//! File and JSON layer around `beco_core`.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - Loading and saving container files
//! - JSON helpers with path context
//! - Filtering exported placements by area id

/// Error types and result aliases for I/O operations
pub mod error;
/// Container file persistence
pub mod persistence;
/// Placement loading and area filtering
pub mod placements;
/// Validated JSON serialization helpers
pub mod serialization;

pub use error::{IoError, Result};
pub use persistence::{load_beco, load_beco_with_frame, save_beco};
pub use placements::{filter_by_area, load_placements, write_points, AreaMatches, Placement};
pub use serialization::{from_json, read_json_file, to_json_pretty, write_json_file};
