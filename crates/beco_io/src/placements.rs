//! Placement filtering by area id.
//!
//! Placements are world objects exported as JSON, each carrying a
//! `Translate: [x, y, z]` position. Filtering looks every placement up in a
//! container and keeps the `(x, z)` pairs that fall in one of the requested
//! areas.

use crate::error::Result;
use crate::serialization::{read_json_file, write_json_file};
use beco_core::Beco;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// A placed object. Fields other than the position are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(rename = "Translate")]
    pub translate: [f64; 3],
}

impl Placement {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            translate: [x, y, z],
        }
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.translate[0]
    }

    #[must_use]
    pub fn z(&self) -> f64 {
        self.translate[2]
    }
}

/// Outcome of [`filter_by_area`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AreaMatches {
    /// Distinct `(x, z)` positions in first-seen order.
    pub points: Vec<(f64, f64)>,
    /// Placements outside the grid's coordinate domain.
    pub skipped: usize,
}

/// Reads a JSON array of placements.
pub fn load_placements<P: AsRef<Path>>(path: P) -> Result<Vec<Placement>> {
    let placements: Vec<Placement> = read_json_file(&path)?;
    tracing::debug!(count = placements.len(), "Loaded placements");
    Ok(placements)
}

/// Keeps the placements whose area id is one of `areas`.
///
/// Placements the container rejects as out of bounds are counted in
/// [`AreaMatches::skipped`] and logged; any other error aborts the filter.
pub fn filter_by_area(beco: &Beco, placements: &[Placement], areas: &[u16]) -> Result<AreaMatches> {
    let wanted: BTreeSet<u16> = areas.iter().copied().collect();
    let mut seen = HashSet::new();
    let mut matches = AreaMatches::default();

    for placement in placements {
        // `+ 0.0` folds -0.0 into 0.0 so both dedupe together.
        let (x, z) = (placement.x() + 0.0, placement.z() + 0.0);
        let id = match beco.query(x, z) {
            Ok(id) => id,
            Err(e) if e.is_out_of_bounds() => {
                tracing::warn!(x, z, error = %e, "Skipping placement outside the map");
                matches.skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if id.is_some_and(|id| wanted.contains(&id)) && seen.insert((x.to_bits(), z.to_bits())) {
            matches.points.push((x, z));
        }
    }

    tracing::info!(
        areas = ?wanted,
        placements = placements.len(),
        matched = matches.points.len(),
        skipped = matches.skipped,
        "Filtered placements"
    );
    Ok(matches)
}

/// Writes `points` as a JSON array of `[x, z]` pairs.
pub fn write_points<P: AsRef<Path>>(points: &[(f64, f64)], path: P) -> Result<()> {
    write_json_file(&points, path)
}
