//! Container header and byte-order detection.
//!
//! The header is 16 bytes: a 4-byte magic whose byte order selects the
//! endianness of every following multi-byte field, the row count, the
//! divisor and four reserved bytes.

use crate::error::{FormatError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Magic as stored by big-endian containers. Little-endian containers store it reversed.
pub const MAGIC: [u8; 4] = [0x00, 0x11, 0x22, 0x33];

/// Size of the fixed header in bytes; the row offset table starts here.
pub const HEADER_SIZE: usize = 0x10;

const NUM_ROWS_OFFSET: usize = 0x04;
const DIVISOR_OFFSET: usize = 0x08;
const RESERVED_OFFSET: usize = 0x0C;

/// Byte order of every multi-byte field in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Big,
    Little,
}

/// Checked `offset..offset + width` inside a buffer of `len` bytes.
pub(crate) fn byte_span(len: usize, offset: usize, width: usize) -> Result<Range<usize>> {
    match offset.checked_add(width) {
        Some(end) if end <= len => Ok(offset..end),
        Some(end) => Err(FormatError::bytes(end, len)),
        None => Err(FormatError::bytes(usize::MAX, len)),
    }
}

impl ByteOrder {
    /// Detects the byte order from the four magic bytes.
    #[must_use]
    pub fn detect(magic: [u8; 4]) -> Option<Self> {
        if magic == MAGIC {
            Some(ByteOrder::Big)
        } else if magic == ByteOrder::Little.magic() {
            Some(ByteOrder::Little)
        } else {
            None
        }
    }

    /// The magic bytes a container in this byte order starts with.
    #[must_use]
    pub fn magic(self) -> [u8; 4] {
        match self {
            ByteOrder::Big => MAGIC,
            ByteOrder::Little => {
                let mut magic = MAGIC;
                magic.reverse();
                magic
            }
        }
    }

    /// The other byte order.
    #[must_use]
    pub fn swapped(self) -> Self {
        match self {
            ByteOrder::Big => ByteOrder::Little,
            ByteOrder::Little => ByteOrder::Big,
        }
    }

    pub fn read_u16(self, buf: &[u8], offset: usize) -> Result<u16> {
        let span = byte_span(buf.len(), offset, 2)?;
        let raw = [buf[span.start], buf[span.start + 1]];
        Ok(match self {
            ByteOrder::Big => u16::from_be_bytes(raw),
            ByteOrder::Little => u16::from_le_bytes(raw),
        })
    }

    pub fn read_u32(self, buf: &[u8], offset: usize) -> Result<u32> {
        let span = byte_span(buf.len(), offset, 4)?;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&buf[span]);
        Ok(match self {
            ByteOrder::Big => u32::from_be_bytes(raw),
            ByteOrder::Little => u32::from_le_bytes(raw),
        })
    }

    pub fn write_u16(self, buf: &mut [u8], offset: usize, value: u16) -> Result<()> {
        let span = byte_span(buf.len(), offset, 2)?;
        let raw = match self {
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
        };
        buf[span].copy_from_slice(&raw);
        Ok(())
    }

    pub fn write_u32(self, buf: &mut [u8], offset: usize, value: u32) -> Result<()> {
        let span = byte_span(buf.len(), offset, 4)?;
        let raw = match self {
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
        };
        buf[span].copy_from_slice(&raw);
        Ok(())
    }
}

/// Parsed container header.
///
/// `divisor` and `reserved` are carried for round-trip fidelity only; no
/// lookup or mutation depends on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub byte_order: ByteOrder,
    pub num_rows: u32,
    pub divisor: u32,
    pub reserved: u32,
}

impl Header {
    /// Parses the header from the start of `buf`.
    ///
    /// # Errors
    /// - [`FormatError::OutOfBounds`] if `buf` is shorter than the header.
    /// - [`FormatError::BadMagic`] if the magic matches neither byte order.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let span = byte_span(buf.len(), 0, MAGIC.len())?;
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&buf[span]);
        let byte_order = ByteOrder::detect(magic).ok_or(FormatError::BadMagic { found: magic })?;

        byte_span(buf.len(), 0, HEADER_SIZE)?;
        Ok(Self {
            byte_order,
            num_rows: byte_order.read_u32(buf, NUM_ROWS_OFFSET)?,
            divisor: byte_order.read_u32(buf, DIVISOR_OFFSET)?,
            reserved: byte_order.read_u32(buf, RESERVED_OFFSET)?,
        })
    }

    /// Writes the header into the first [`HEADER_SIZE`] bytes of `buf`.
    pub fn write(&self, buf: &mut [u8]) -> Result<()> {
        let span = byte_span(buf.len(), 0, HEADER_SIZE)?;
        buf[span.start..span.start + 4].copy_from_slice(&self.byte_order.magic());
        self.byte_order.write_u32(buf, NUM_ROWS_OFFSET, self.num_rows)?;
        self.byte_order.write_u32(buf, DIVISOR_OFFSET, self.divisor)?;
        self.byte_order.write_u32(buf, RESERVED_OFFSET, self.reserved)
    }

    /// Byte offset of the offset-table entry for `row`.
    #[must_use]
    pub fn table_entry_offset(row: u32) -> usize {
        HEADER_SIZE + row as usize * 4
    }

    /// First byte after the offset table, the base all row offsets are relative to.
    #[must_use]
    pub fn segment_base(&self) -> usize {
        HEADER_SIZE + self.num_rows as usize * 4
    }

    #[must_use]
    pub fn is_big_endian(&self) -> bool {
        self.byte_order == ByteOrder::Big
    }
}
