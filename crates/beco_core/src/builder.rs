//! Encoder that lays out rows of segments as a container buffer.

use crate::error::{FormatError, Result};
use crate::grid::Beco;
use crate::header::{ByteOrder, Header, HEADER_SIZE};
use crate::segment::{Segment, SEGMENT_SIZE};

/// Builds a well-formed container from rows of segments.
///
/// Two empty rows are appended after the data rows: the row that `z` values
/// past the map clamp to, and the end-sentinel row. A builder with `n` rows
/// therefore produces `num_rows = n + 2`, and every row it was given can be
/// queried.
#[derive(Debug, Clone)]
pub struct BecoBuilder {
    byte_order: ByteOrder,
    divisor: u32,
    reserved: u32,
    rows: Vec<Vec<Segment>>,
}

impl BecoBuilder {
    #[must_use]
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            divisor: 1,
            reserved: 0,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn divisor(mut self, divisor: u32) -> Self {
        self.divisor = divisor;
        self
    }

    #[must_use]
    pub fn reserved(mut self, reserved: u32) -> Self {
        self.reserved = reserved;
        self
    }

    /// Appends one data row.
    #[must_use]
    pub fn row<I>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = Segment>,
    {
        self.rows.push(segments.into_iter().collect());
        self
    }

    /// Appends `count` copies of the same row.
    #[must_use]
    pub fn repeat_row(mut self, segments: &[Segment], count: usize) -> Self {
        self.rows.extend((0..count).map(|_| segments.to_vec()));
        self
    }

    /// Encodes the header, offset table and segment data.
    ///
    /// # Errors
    /// [`FormatError::TooLarge`] if the row count or the segment data do not
    /// fit the 32-bit header and offset table.
    pub fn build(&self) -> Result<Vec<u8>> {
        let total_rows = self.rows.len() + 2;
        let num_rows = u32::try_from(total_rows).map_err(|_| FormatError::TooLarge {
            what: "row count",
            value: total_rows,
        })?;
        let header = Header {
            byte_order: self.byte_order,
            num_rows,
            divisor: self.divisor,
            reserved: self.reserved,
        };

        let segment_bytes: usize = self.rows.iter().map(|row| row.len() * SEGMENT_SIZE).sum();
        // Table entries count 2-byte units.
        if u32::try_from(segment_bytes / 2).is_err() {
            return Err(FormatError::TooLarge {
                what: "segment data",
                value: segment_bytes,
            });
        }

        let base = header.segment_base();
        let mut buf = vec![0u8; base + segment_bytes];
        header.write(&mut buf)?;

        let mut cursor = base;
        let mut row_index = 0u32;
        for row in &self.rows {
            self.write_table_entry(&mut buf, row_index, cursor - base)?;
            for segment in row {
                segment.write(self.byte_order, &mut buf, cursor)?;
                cursor += SEGMENT_SIZE;
            }
            row_index += 1;
        }
        // Clamp row and sentinel row both start at the end of the data.
        for row in row_index..num_rows {
            self.write_table_entry(&mut buf, row, cursor - base)?;
        }

        debug_assert_eq!(buf.len(), HEADER_SIZE + num_rows as usize * 4 + segment_bytes);
        Ok(buf)
    }

    /// Encodes and parses the result in one step.
    pub fn build_beco(&self) -> Result<Beco> {
        Beco::new(self.build()?)
    }

    fn write_table_entry(&self, buf: &mut [u8], row: u32, relative_bytes: usize) -> Result<()> {
        // Bounded by the segment data size checked in `build`.
        let units = (relative_bytes / 2) as u32;
        self.byte_order.write_u32(buf, Header::table_entry_offset(row), units)
    }
}
