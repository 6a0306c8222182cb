use beco_core::{Beco, BecoBuilder, ByteOrder, Segment};

/// One data row `(7, 5000), (9, 5000)` covering the full default x range.
#[allow(dead_code)]
pub fn two_area_row(order: ByteOrder) -> Beco {
    BecoBuilder::new(order)
        .row([Segment::new(7, 5000), Segment::new(9, 5000)])
        .build_beco()
        .expect("two-area fixture")
}

/// A small field with rows of varying coverage, an empty row and a
/// repeated id spread over several rows.
#[allow(dead_code)]
pub fn mixed_field(order: ByteOrder) -> Beco {
    BecoBuilder::new(order)
        .divisor(4)
        .row([Segment::new(1, 100), Segment::new(2, 50), Segment::new(1, 25)])
        .row(Vec::<Segment>::new())
        .row([Segment::new(3, 10_000)])
        .row([Segment::new(2, 1), Segment::new(4, 0), Segment::new(5, 9)])
        .build_beco()
        .expect("mixed fixture")
}

/// Unique temp file path for a test.
#[allow(dead_code)]
pub fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("beco_it_{}_{}", std::process::id(), name))
}

/// World `z` at the middle of `row` in the default frame.
#[allow(dead_code)]
pub fn z_of_row(row: u32) -> f64 {
    f64::from(row) - 4000.0 + 0.5
}

/// World `x` of `column` in the default frame.
#[allow(dead_code)]
pub fn x_of_column(column: u64) -> f64 {
    column as f64 - 5000.0
}
