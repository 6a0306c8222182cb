//! # Beco Core
//!
//! Reader, writer and query engine for the beco area-grid format: a
//! row-indexed, run-length-encoded grid mapping world coordinates `(x, z)` to
//! small integer area ids.
//!
//! This crate contains:
//! - Byte-order detection and header parsing
//! - Row offset table resolution
//! - Run-length segment decoding and point lookup
//! - In-place bulk rewriting of area ids
//! - An encoder for building containers from rows of segments
//!
//! ## Example
//!
//! ```
//! use beco_core::{Beco, BecoBuilder, ByteOrder, Segment};
//!
//! let bytes = BecoBuilder::new(ByteOrder::Little)
//!     .row([Segment::new(3, 10_000)])
//!     .build()
//!     .unwrap();
//!
//! let beco = Beco::new(bytes).unwrap();
//! assert_eq!(beco.query(0.0, -4000.0).unwrap(), Some(3));
//! ```

/// Encoder producing well-formed containers
pub mod builder;
/// Configuration management (`beco.toml`)
pub mod config;
/// Error types and result aliases
pub mod error;
/// World-to-grid coordinate mapping
pub mod frame;
/// The container: lookup, mutation, inspection and conversion
pub mod grid;
/// Header layout and byte-order detection
pub mod header;
/// Run-length segment codec
pub mod segment;

pub use builder::BecoBuilder;
pub use config::AppConfig;
pub use error::{Axis, Bound, FormatError, Result};
pub use frame::CoordinateFrame;
pub use grid::{Beco, UNRESOLVED};
pub use header::{ByteOrder, Header, HEADER_SIZE, MAGIC};
pub use segment::{RowSpan, Segment, Segments, SEGMENT_SIZE};
