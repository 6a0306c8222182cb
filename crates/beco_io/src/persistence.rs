//! Loading and saving containers on disk.

use crate::error::{IoError, Result};
use beco_core::{Beco, CoordinateFrame};
use std::path::Path;

/// Reads `path` and parses it as a container with the default frame.
pub fn load_beco<P: AsRef<Path>>(path: P) -> Result<Beco> {
    load_beco_with_frame(path, CoordinateFrame::default())
}

/// Reads `path` and parses it as a container using `frame` for queries.
pub fn load_beco_with_frame<P: AsRef<Path>>(path: P, frame: CoordinateFrame) -> Result<Beco> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("reading map {:?}", path)))?;
    let beco = Beco::new(bytes)
        .map_err(|e| IoError::Format(e).with_context(format!("parsing map {:?}", path)))?;
    tracing::info!(
        path = %path.display(),
        rows = beco.num_rows(),
        big_endian = beco.is_big_endian(),
        "Loaded map"
    );
    Ok(beco.with_frame(frame))
}

/// Writes the raw buffer of `beco` to `path`.
pub fn save_beco<P: AsRef<Path>>(beco: &Beco, path: P) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, beco.as_bytes())
        .map_err(|e| IoError::FileSystem(e).with_context(format!("writing map {:?}", path)))?;
    tracing::info!(path = %path.display(), bytes = beco.as_bytes().len(), "Saved map");
    Ok(())
}
