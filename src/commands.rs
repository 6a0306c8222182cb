//! Command implementations behind the `beco` binary.
//!
//! Each command takes already-resolved inputs and returns a value the binary
//! prints, so the same code paths are exercised by the integration tests.

use anyhow::{Context, Result};
use beco_core::{AppConfig, Beco, ByteOrder};
use beco_io::{AreaMatches, Placement};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Summary printed by `beco info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapInfo {
    pub byte_order: ByteOrder,
    pub num_rows: u32,
    pub addressable_rows: u32,
    pub divisor: u32,
    pub reserved: u32,
    pub bytes: usize,
    pub fingerprint: String,
    /// Columns covered per area id.
    pub areas: BTreeMap<u16, u64>,
}

impl std::fmt::Display for MapInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "byte order:  {:?}", self.byte_order)?;
        writeln!(f, "rows:        {} ({} addressable)", self.num_rows, self.addressable_rows)?;
        writeln!(f, "divisor:     {}", self.divisor)?;
        writeln!(f, "reserved:    {:#010x}", self.reserved)?;
        writeln!(f, "size:        {} bytes", self.bytes)?;
        writeln!(f, "sha256:      {}", self.fingerprint)?;
        write!(f, "areas:       {}", self.areas.len())?;
        for (id, columns) in &self.areas {
            write!(f, "\n  {id:>5}  {columns} columns")?;
        }
        Ok(())
    }
}

/// Picks the command-line path, falling back to the configured one.
pub fn resolve_path(arg: Option<PathBuf>, configured: &Option<PathBuf>, what: &str) -> Result<PathBuf> {
    arg.or_else(|| configured.clone())
        .with_context(|| format!("No {what} path given on the command line or in the config file"))
}

/// Loads the map at `path` with the configured coordinate frame.
pub fn open_map(path: &Path, config: &AppConfig) -> Result<Beco> {
    Ok(beco_io::load_beco_with_frame(path, config.frame)?)
}

pub fn info(beco: &Beco) -> Result<MapInfo> {
    let header = beco.header();
    Ok(MapInfo {
        byte_order: header.byte_order,
        num_rows: header.num_rows,
        addressable_rows: beco.addressable_rows(),
        divisor: header.divisor,
        reserved: header.reserved,
        bytes: beco.as_bytes().len(),
        fingerprint: beco.fingerprint(),
        areas: beco.area_ids().context("Failed to scan segments")?,
    })
}

/// Area id at `(x, z)`, `-1` when no segment covers the point.
pub fn query(beco: &Beco, x: f64, z: f64) -> Result<i32> {
    beco.query_id(x, z)
        .with_context(|| format!("Failed to query ({x}, {z})"))
}

/// Rewrites `old` to `new` and saves the result to `output`.
pub fn replace(beco: &mut Beco, old: u16, new: u16, output: &Path) -> Result<usize> {
    let rewritten = beco
        .replace_data(old, new)
        .with_context(|| format!("Failed to replace area {old} with {new}"))?;
    beco_io::save_beco(beco, output)?;
    Ok(rewritten)
}

/// Re-encodes the map in `order` and saves it to `output`.
pub fn convert(beco: &Beco, order: ByteOrder, output: &Path) -> Result<Beco> {
    let converted = beco
        .to_byte_order(order)
        .context("Failed to convert byte order")?;
    beco_io::save_beco(&converted, output)?;
    Ok(converted)
}

/// Filters placements by area and optionally writes the points file.
pub fn filter(
    beco: &Beco,
    placements: &[Placement],
    areas: &[u16],
    output: Option<&Path>,
) -> Result<AreaMatches> {
    anyhow::ensure!(!areas.is_empty(), "At least one area id is required");
    let matches = beco_io::filter_by_area(beco, placements, areas)?;
    if let Some(path) = output {
        beco_io::write_points(&matches.points, path)?;
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beco_core::{BecoBuilder, Segment};

    #[test]
    fn test_resolve_path_prefers_argument() {
        let configured = Some(PathBuf::from("config.beco"));
        assert_eq!(
            resolve_path(Some("arg.beco".into()), &configured, "map").unwrap(),
            PathBuf::from("arg.beco")
        );
        assert_eq!(
            resolve_path(None, &configured, "map").unwrap(),
            PathBuf::from("config.beco")
        );
        let err = resolve_path(None, &None, "map").unwrap_err();
        assert!(err.to_string().contains("No map path"));
    }

    #[test]
    fn test_info_display() {
        let beco = BecoBuilder::new(ByteOrder::Little)
            .row([Segment::new(3, 10), Segment::new(4, 2)])
            .build_beco()
            .unwrap();
        let info = info(&beco).unwrap();
        assert_eq!(info.addressable_rows, 1);
        let text = info.to_string();
        assert!(text.contains("byte order:  Little"));
        assert!(text.contains("    3  10 columns"));
    }

    #[test]
    fn test_filter_requires_areas() {
        let beco = BecoBuilder::new(ByteOrder::Big).build_beco().unwrap();
        assert!(filter(&beco, &[], &[], None).is_err());
    }
}
