//! # Beco
//!
//! Command-line tooling for beco area grids: inspection, point queries,
//! bulk area rewrites, byte-order conversion and placement filtering.

pub mod commands;
pub mod logging;

pub use beco_core;
pub use beco_io;
