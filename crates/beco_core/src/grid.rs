use crate::error::{FormatError, Result};
use crate::frame::CoordinateFrame;
use crate::header::{byte_span, ByteOrder, Header};
use crate::segment::{resolve_column, RowSpan, Segments};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Id returned by [`Beco::query_id`] when no segment covers the point.
pub const UNRESOLVED: i32 = -1;

/// Row-indexed, run-length-encoded area grid over an owned byte buffer.
///
/// The buffer is the only storage: rows and segments are views computed from
/// the offset table on every call, so nothing goes stale when
/// [`Beco::replace_data`] rewrites ids in place.
///
/// # Layout
/// - `0x00..0x10`: [`Header`]
/// - `0x10..`: one `u32` per row, the row's start in 2-byte units relative to
///   the end of the table
/// - segment data: `(data: u16, length: u16)` runs, row after row
///
/// Only rows `0..num_rows - 2` hold data that can be queried. Row
/// `num_rows - 2` is where out-of-range `z` values clamp to, and row
/// `num_rows - 1` only marks where the previous row ends.
///
/// # Examples
/// ```
/// use beco_core::{Beco, BecoBuilder, ByteOrder, Segment};
///
/// let bytes = BecoBuilder::new(ByteOrder::Big)
///     .row([Segment::new(7, 5000), Segment::new(9, 5000)])
///     .build()
///     .unwrap();
/// let mut beco = Beco::new(bytes).unwrap();
///
/// assert_eq!(beco.query(-4999.0, -4000.0).unwrap(), Some(7));
/// assert_eq!(beco.query(1.0, -4000.0).unwrap(), Some(9));
///
/// beco.replace_data(7, 42).unwrap();
/// assert_eq!(beco.query_id(-4999.0, -4000.0).unwrap(), 42);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Beco {
    data: Vec<u8>,
    header: Header,
    frame: CoordinateFrame,
}

impl Beco {
    /// Takes ownership of `data` and validates it as a container.
    ///
    /// Besides the magic, the header, the whole offset table and every row
    /// start are checked to lie inside the buffer, so later calls can only
    /// fail on segments that straddle the end of the buffer.
    ///
    /// # Errors
    /// - [`FormatError::BadMagic`] if the magic matches neither byte order.
    /// - [`FormatError::TooFewRows`] if fewer than two rows are declared.
    /// - [`FormatError::OutOfBounds`] if the header, table or a row start
    ///   lies outside the buffer.
    pub fn new(data: Vec<u8>) -> Result<Self> {
        let header = Header::parse(&data)?;
        if header.num_rows < 2 {
            return Err(FormatError::TooFewRows(header.num_rows));
        }
        byte_span(data.len(), 0, header.segment_base())?;

        let beco = Self {
            data,
            header,
            frame: CoordinateFrame::default(),
        };
        for row in 0..header.num_rows {
            let start = beco.row_byte_offset(row)?;
            if start > beco.data.len() {
                return Err(FormatError::bytes(start, beco.data.len()));
            }
        }

        tracing::debug!(
            byte_order = ?header.byte_order,
            num_rows = header.num_rows,
            divisor = header.divisor,
            len = beco.data.len(),
            "Loaded beco container"
        );
        Ok(beco)
    }

    /// Copies `bytes` into a new container.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::new(bytes.to_vec())
    }

    /// Replaces the world-to-grid translation used by coordinate queries.
    #[must_use]
    pub fn with_frame(mut self, frame: CoordinateFrame) -> Self {
        self.frame = frame;
        self
    }

    #[must_use]
    pub fn frame(&self) -> &CoordinateFrame {
        &self.frame
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[must_use]
    pub fn byte_order(&self) -> ByteOrder {
        self.header.byte_order
    }

    #[must_use]
    pub fn is_big_endian(&self) -> bool {
        self.header.is_big_endian()
    }

    #[must_use]
    pub fn num_rows(&self) -> u32 {
        self.header.num_rows
    }

    #[must_use]
    pub fn divisor(&self) -> u32 {
        self.header.divisor
    }

    /// Number of rows that carry queryable data (`num_rows - 2`).
    #[must_use]
    pub fn addressable_rows(&self) -> u32 {
        self.header.num_rows - 2
    }

    /// The raw buffer, including any ids rewritten by [`Beco::replace_data`].
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset where the segment list of `row` starts.
    ///
    /// # Errors
    /// [`FormatError::OutOfBounds`] if `row >= num_rows`.
    pub fn row_byte_offset(&self, row: u32) -> Result<usize> {
        if row >= self.header.num_rows {
            return Err(FormatError::row(row, self.header.num_rows));
        }
        let entry = self
            .header
            .byte_order
            .read_u32(&self.data, Header::table_entry_offset(row))?;
        (entry as usize)
            .checked_mul(2)
            .and_then(|relative| relative.checked_add(self.header.segment_base()))
            .ok_or_else(|| FormatError::bytes(usize::MAX, self.data.len()))
    }

    /// Row holding world `z`, clamped to at most `num_rows - 2`.
    pub fn row_index_for_z(&self, z: f64) -> Result<u32> {
        let row = self.frame.row_for_z(z)?;
        let last = u64::from(self.header.num_rows - 2);
        // `last` fits in u32, so the clamped value does too.
        Ok(row.min(last) as u32)
    }

    /// Column holding world `x`. Never clamped.
    pub fn column_for_x(&self, x: f64) -> Result<u64> {
        self.frame.column_for_x(x)
    }

    /// Span from the start of `row` to the start of `row + 1`.
    pub fn row_span(&self, row: u32) -> Result<RowSpan> {
        let next = row
            .checked_add(1)
            .ok_or_else(|| FormatError::row(row, self.header.num_rows))?;
        Ok(RowSpan {
            index: row,
            start: self.row_byte_offset(row)?,
            end: self.row_byte_offset(next)?,
        })
    }

    /// Spans of every addressable row, in row order.
    pub fn rows(&self) -> impl Iterator<Item = Result<RowSpan>> + '_ {
        (0..self.addressable_rows()).map(move |row| self.row_span(row))
    }

    /// Decoded segments of `span`.
    pub fn segments(&self, span: &RowSpan) -> Segments<'_> {
        Segments::new(&self.data, self.header.byte_order, span)
    }

    /// Area id at world `(x, z)`, or `None` if no segment covers the point.
    ///
    /// The walk runs from the row holding `z` up to the start of the row
    /// holding `z + 1`. Once `z` is past the last data row both clamp to the
    /// same row and the span is empty.
    ///
    /// # Errors
    /// [`FormatError::OutOfBounds`] if either coordinate lies before the grid
    /// origin or a segment runs past the end of the buffer.
    pub fn query(&self, x: f64, z: f64) -> Result<Option<u16>> {
        let column = self.column_for_x(x)?;
        let row = self.row_index_for_z(z)?;
        let span = RowSpan {
            index: row,
            start: self.row_byte_offset(row)?,
            end: self.row_byte_offset(self.row_index_for_z(z + 1.0)?)?,
        };
        if span.is_empty() {
            return Ok(None);
        }
        resolve_column(self.segments(&span), column)
    }

    /// [`Beco::query`] with unresolved points reported as [`UNRESOLVED`].
    pub fn query_id(&self, x: f64, z: f64) -> Result<i32> {
        Ok(self.query(x, z)?.map_or(UNRESOLVED, i32::from))
    }

    /// Rewrites every segment whose id is `old` to `new`, in place.
    ///
    /// Segment lengths are untouched. All matches are located before anything
    /// is written, so an error leaves the buffer unchanged.
    ///
    /// Returns the number of rewritten segments.
    pub fn replace_data(&mut self, old: u16, new: u16) -> Result<usize> {
        if old == new {
            return Ok(0);
        }

        let order = self.header.byte_order;
        let mut hits = Vec::new();
        for span in self.rows() {
            for offset in span?.segment_offsets() {
                if order.read_u16(&self.data, offset)? == old {
                    hits.push(offset);
                }
            }
        }

        for &offset in &hits {
            order.write_u16(&mut self.data, offset, new)?;
        }
        tracing::info!(old, new, segments = hits.len(), "Replaced area id");
        Ok(hits.len())
    }

    /// Total number of columns covered by the segments of `row`.
    pub fn row_coverage(&self, row: u32) -> Result<u64> {
        let span = self.row_span(row)?;
        self.segments(&span)
            .map(|segment| segment.map(|s| u64::from(s.length)))
            .sum()
    }

    /// Distinct area ids of the addressable rows with the columns each covers.
    pub fn area_ids(&self) -> Result<BTreeMap<u16, u64>> {
        let mut ids = BTreeMap::new();
        for span in self.rows() {
            for segment in self.segments(&span?) {
                let segment = segment?;
                *ids.entry(segment.data).or_insert(0) += u64::from(segment.length);
            }
        }
        Ok(ids)
    }

    /// Re-encodes the container in `order`.
    ///
    /// Header fields and table entries are swapped as 32-bit values, and
    /// everything after the table as 16-bit words, which covers every segment
    /// of every row including the clamp and sentinel rows.
    pub fn to_byte_order(&self, order: ByteOrder) -> Result<Beco> {
        let from = self.header.byte_order;
        if from == order {
            return Ok(self.clone());
        }

        let mut data = self.data.clone();
        let header = Header {
            byte_order: order,
            ..self.header
        };
        header.write(&mut data)?;

        for row in 0..header.num_rows {
            let offset = Header::table_entry_offset(row);
            order.write_u32(&mut data, offset, from.read_u32(&self.data, offset)?)?;
        }
        let base = header.segment_base();
        let words = (self.data.len() - base) / 2;
        for word in 0..words {
            let offset = base + word * 2;
            order.write_u16(&mut data, offset, from.read_u16(&self.data, offset)?)?;
        }

        tracing::debug!(?from, to = ?order, "Converted beco byte order");
        Ok(Beco::new(data)?.with_frame(self.frame))
    }

    /// Lowercase hex SHA-256 of the raw buffer.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.data);
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BecoBuilder;
    use crate::header::HEADER_SIZE;
    use crate::segment::Segment;

    /// Header `num_rows = 3`, table `[0, 4, 4]`, row 0 = `(7, 5000), (9, 5000)`.
    fn hand_encoded(order: ByteOrder) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_SIZE + 3 * 4 + 2 * 4];
        Header {
            byte_order: order,
            num_rows: 3,
            divisor: 1,
            reserved: 0,
        }
        .write(&mut buf)
        .unwrap();
        for (row, entry) in [0u32, 4, 4].into_iter().enumerate() {
            order
                .write_u32(&mut buf, Header::table_entry_offset(row as u32), entry)
                .unwrap();
        }
        Segment::new(7, 5000).write(order, &mut buf, 28).unwrap();
        Segment::new(9, 5000).write(order, &mut buf, 32).unwrap();
        buf
    }

    #[test]
    fn test_hand_encoded_container() {
        let beco = Beco::new(hand_encoded(ByteOrder::Big)).unwrap();
        assert!(beco.is_big_endian());
        assert_eq!(beco.num_rows(), 3);
        assert_eq!(beco.divisor(), 1);
        assert_eq!(beco.row_byte_offset(0).unwrap(), 28);
        assert_eq!(beco.row_byte_offset(1).unwrap(), 36);
        assert_eq!(beco.row_byte_offset(2).unwrap(), 36);

        assert_eq!(beco.query(-4999.0, -4000.0).unwrap(), Some(7));
        assert_eq!(beco.query(1.0, -4000.0).unwrap(), Some(9));
        assert_eq!(beco.query_id(5000.0, -4000.0).unwrap(), UNRESOLVED);
    }

    #[test]
    fn test_builder_matches_hand_encoding() {
        for order in [ByteOrder::Big, ByteOrder::Little] {
            let built = BecoBuilder::new(order)
                .divisor(1)
                .row([Segment::new(7, 5000), Segment::new(9, 5000)])
                .build()
                .unwrap();
            // The builder appends the clamp row and the sentinel row.
            let beco = Beco::new(built).unwrap();
            assert_eq!(beco.num_rows(), 3);
            assert_eq!(beco.as_bytes(), hand_encoded(order).as_slice());
        }
    }

    #[test]
    fn test_row_index_clamps_to_last_data_row() {
        let beco = Beco::new(hand_encoded(ByteOrder::Little)).unwrap();
        assert_eq!(beco.row_index_for_z(-4000.0).unwrap(), 0);
        assert_eq!(beco.row_index_for_z(-3999.0).unwrap(), 1);
        assert_eq!(beco.row_index_for_z(1e9).unwrap(), 1);
        assert_eq!(beco.query(0.0, -3999.0).unwrap(), None);
    }

    #[test]
    fn test_row_byte_offset_rejects_out_of_range_rows() {
        let beco = Beco::new(hand_encoded(ByteOrder::Big)).unwrap();
        assert_eq!(beco.row_byte_offset(3), Err(FormatError::row(3, 3)));
        assert!(beco.row_span(2).is_err());
        assert!(beco.row_span(u32::MAX).is_err());
    }

    #[test]
    fn test_negative_coordinates_fail() {
        let beco = Beco::new(hand_encoded(ByteOrder::Big)).unwrap();
        assert!(beco.query(-5001.0, 0.0).unwrap_err().is_out_of_bounds());
        assert!(beco.query(0.0, -4000.5).unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn test_replace_data_rewrites_only_data() {
        let mut beco = Beco::new(hand_encoded(ByteOrder::Big)).unwrap();
        assert_eq!(beco.replace_data(7, 42).unwrap(), 1);

        let mut expected = hand_encoded(ByteOrder::Big);
        expected[28..30].copy_from_slice(&42u16.to_be_bytes());
        assert_eq!(beco.as_bytes(), expected.as_slice());
        assert_eq!(beco.query(-4999.0, -4000.0).unwrap(), Some(42));
        assert_eq!(beco.query(1.0, -4000.0).unwrap(), Some(9));
    }

    #[test]
    fn test_replace_same_id_is_noop() {
        let mut beco = Beco::new(hand_encoded(ByteOrder::Big)).unwrap();
        assert_eq!(beco.replace_data(7, 7).unwrap(), 0);
        assert_eq!(beco.replace_data(1234, 5).unwrap(), 0);
        assert_eq!(beco.as_bytes(), hand_encoded(ByteOrder::Big).as_slice());
    }

    #[test]
    fn test_construction_rejects_short_and_bad_buffers() {
        let buf = hand_encoded(ByteOrder::Big);

        let mut bad = buf.clone();
        bad[3] = 0x34;
        assert!(matches!(Beco::new(bad), Err(FormatError::BadMagic { .. })));

        // Table cut in half.
        assert!(Beco::from_slice(&buf[..20]).unwrap_err().is_out_of_bounds());

        let mut one_row = buf.clone();
        ByteOrder::Big.write_u32(&mut one_row, 4, 1).unwrap();
        assert_eq!(Beco::new(one_row), Err(FormatError::TooFewRows(1)));

        // Row start beyond the end of the buffer.
        let mut far = buf;
        ByteOrder::Big.write_u32(&mut far, Header::table_entry_offset(2), 100).unwrap();
        assert!(Beco::new(far).unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn test_segment_straddling_buffer_end() {
        let mut buf = hand_encoded(ByteOrder::Big);
        // Rows 1 and 2 start half way through the second segment.
        for row in 1..3 {
            ByteOrder::Big
                .write_u32(&mut buf, Header::table_entry_offset(row), 3)
                .unwrap();
        }
        buf.truncate(34);
        let mut beco = Beco::new(buf).unwrap();

        assert_eq!(beco.query(-4999.0, -4000.0).unwrap(), Some(7));
        assert!(beco.query(1.0, -4000.0).unwrap_err().is_out_of_bounds());
        // Only data fields are read while replacing, and those are in range.
        assert_eq!(beco.replace_data(9, 10).unwrap(), 1);
    }

    #[test]
    fn test_area_ids_and_coverage() {
        let beco = BecoBuilder::new(ByteOrder::Little)
            .row([Segment::new(1, 10), Segment::new(2, 5)])
            .row([Segment::new(2, 20)])
            .build_beco()
            .unwrap();
        assert_eq!(beco.row_coverage(0).unwrap(), 15);
        assert_eq!(beco.row_coverage(1).unwrap(), 20);
        assert_eq!(beco.row_coverage(2).unwrap(), 0);

        let ids = beco.area_ids().unwrap();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![(1, 10), (2, 25)]);
    }

    #[test]
    fn test_byte_order_conversion() {
        let big = Beco::new(hand_encoded(ByteOrder::Big)).unwrap();
        let little = big.to_byte_order(ByteOrder::Little).unwrap();

        assert_eq!(little.as_bytes(), hand_encoded(ByteOrder::Little).as_slice());
        assert_ne!(big.fingerprint(), little.fingerprint());
        assert_eq!(little.to_byte_order(ByteOrder::Big).unwrap(), big);
    }

    #[test]
    fn test_fingerprint_is_sha256_hex() {
        let beco = Beco::new(hand_encoded(ByteOrder::Big)).unwrap();
        let fingerprint = beco.fingerprint();
        assert_eq!(fingerprint.len(), 64);
        assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fingerprint, beco.clone().fingerprint());
    }
}
