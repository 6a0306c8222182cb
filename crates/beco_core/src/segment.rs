//! Run-length row codec.
//!
//! A row is a run of 4-byte `(data, length)` segments. The column a segment
//! covers is determined by the running sum of the lengths before it, so a
//! lookup is a linear walk that stops at the first segment whose cumulative
//! length passes the requested column.

use crate::error::Result;
use crate::header::ByteOrder;
use serde::{Deserialize, Serialize};

/// Encoded size of one segment.
pub const SEGMENT_SIZE: usize = 4;

/// A run of `length` columns that all carry the area id `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub data: u16,
    pub length: u16,
}

impl Segment {
    #[must_use]
    pub const fn new(data: u16, length: u16) -> Self {
        Self { data, length }
    }

    pub fn read(order: ByteOrder, buf: &[u8], offset: usize) -> Result<Self> {
        Ok(Self {
            data: order.read_u16(buf, offset)?,
            length: order.read_u16(buf, offset + 2)?,
        })
    }

    pub fn write(self, order: ByteOrder, buf: &mut [u8], offset: usize) -> Result<()> {
        order.write_u16(buf, offset, self.data)?;
        order.write_u16(buf, offset + 2, self.length)
    }
}

/// Byte range `[start, end)` of one row's segment list.
///
/// A span is a view computed from the offset table; it must be recomputed
/// after the container is mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub index: u32,
    pub start: usize,
    pub end: usize,
}

impl RowSpan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Byte offsets of every segment that starts inside the span.
    pub fn segment_offsets(&self) -> impl Iterator<Item = usize> {
        (self.start..self.end).step_by(SEGMENT_SIZE)
    }
}

/// Iterator over the decoded segments of a [`RowSpan`].
///
/// Yields one error and then stops if a segment runs off the buffer.
pub struct Segments<'a> {
    buf: &'a [u8],
    order: ByteOrder,
    offset: usize,
    end: usize,
}

impl<'a> Segments<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8], order: ByteOrder, span: &RowSpan) -> Self {
        Self {
            buf,
            order,
            offset: span.start,
            end: span.end,
        }
    }
}

impl Iterator for Segments<'_> {
    type Item = Result<Segment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.end {
            return None;
        }
        let segment = Segment::read(self.order, self.buf, self.offset);
        self.offset = match segment {
            Ok(_) => self.offset + SEGMENT_SIZE,
            Err(_) => self.end,
        };
        Some(segment)
    }
}

/// Walks `segments` and returns the id of the one covering `column`.
///
/// Returns `Ok(None)` when the row's total length does not reach `column`.
pub fn resolve_column<I>(segments: I, column: u64) -> Result<Option<u16>>
where
    I: IntoIterator<Item = Result<Segment>>,
{
    let mut covered = 0u64;
    for segment in segments {
        let segment = segment?;
        covered += u64::from(segment.length);
        if column < covered {
            return Ok(Some(segment.data));
        }
    }
    Ok(None)
}
