//! World-to-grid coordinate mapping.

use crate::error::{Axis, FormatError, Result};
use serde::{Deserialize, Serialize};

/// Translation from world coordinates to grid indices.
///
/// The grid's column 0 sits at world `x = -x_origin` and its row 0 at world
/// `z = -z_origin`. The default frame covers a map spanning roughly
/// `x ∈ [-5000, 5000)` and `z ∈ [-4000, 4000)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinateFrame {
    pub x_origin: f64,
    pub z_origin: f64,
}

impl Default for CoordinateFrame {
    fn default() -> Self {
        Self {
            x_origin: 5000.0,
            z_origin: 4000.0,
        }
    }
}

impl CoordinateFrame {
    /// Column index for world `x`: `floor(x + x_origin)`, never clamped.
    ///
    /// # Errors
    /// [`FormatError::OutOfBounds`] if the index would be negative or `x` is NaN.
    pub fn column_for_x(&self, x: f64) -> Result<u64> {
        grid_index(Axis::X, x, x + self.x_origin)
    }

    /// Unclamped row index for world `z`: `floor(z + z_origin)`.
    ///
    /// # Errors
    /// [`FormatError::OutOfBounds`] if the index would be negative or `z` is NaN.
    pub fn row_for_z(&self, z: f64) -> Result<u64> {
        grid_index(Axis::Z, z, z + self.z_origin)
    }
}

fn grid_index(axis: Axis, world: f64, shifted: f64) -> Result<u64> {
    let index = shifted.floor();
    if index.is_nan() || index < 0.0 {
        return Err(FormatError::coordinate(axis, world));
    }
    // Float to int casts saturate, so +inf lands on u64::MAX.
    Ok(index as u64)
}
