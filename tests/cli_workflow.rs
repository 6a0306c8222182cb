mod common;

use beco_core::{AppConfig, ByteOrder, CoordinateFrame};
use beco_io::Placement;
use beco_lib::commands;
use common::{mixed_field, temp_path, two_area_row};

#[test]
fn test_replace_round_trips_through_disk() {
    let input = temp_path("replace_in.beco");
    let output = temp_path("replace_out.beco");
    beco_io::save_beco(&two_area_row(ByteOrder::Little), &input).unwrap();

    let config = AppConfig::default();
    let mut beco = commands::open_map(&input, &config).unwrap();
    assert_eq!(commands::replace(&mut beco, 7, 42, &output).unwrap(), 1);

    let reloaded = commands::open_map(&output, &config).unwrap();
    let untouched = commands::open_map(&input, &config).unwrap();
    std::fs::remove_file(&input).ok();
    std::fs::remove_file(&output).ok();

    assert_eq!(commands::query(&reloaded, -4999.0, -4000.0).unwrap(), 42);
    assert_eq!(commands::query(&untouched, -4999.0, -4000.0).unwrap(), 7);
}

#[test]
fn test_convert_and_info() {
    let input = temp_path("convert_in.beco");
    let output = temp_path("convert_out.beco");
    beco_io::save_beco(&mixed_field(ByteOrder::Big), &input).unwrap();

    let config = AppConfig::default();
    let beco = commands::open_map(&input, &config).unwrap();
    let converted = commands::convert(&beco, ByteOrder::Little, &output).unwrap();
    let on_disk = commands::open_map(&output, &config).unwrap();
    std::fs::remove_file(&input).ok();
    std::fs::remove_file(&output).ok();

    assert_eq!(on_disk.fingerprint(), converted.fingerprint());

    let before = commands::info(&beco).unwrap();
    let after = commands::info(&on_disk).unwrap();
    assert_eq!(before.byte_order, ByteOrder::Big);
    assert_eq!(after.byte_order, ByteOrder::Little);
    assert_eq!(before.areas, after.areas);
    assert_eq!(after.num_rows, 6);
    assert_eq!(after.divisor, 4);

    let json = beco_io::to_json_pretty(&after).unwrap();
    assert!(json.contains("\"byte_order\": \"little\""));
}

#[test]
fn test_filter_statues_to_points_file() {
    let map = temp_path("filter.beco");
    let statues = temp_path("statues.json");
    let points = temp_path("points.json");
    beco_io::save_beco(&two_area_row(ByteOrder::Big), &map).unwrap();
    std::fs::write(
        &statues,
        r#"[
            {"Translate": [-4999.0, 10.0, -4000.0], "UnitConfigName": "Statue_A"},
            {"Translate": [-4999.0, 99.0, -4000.0], "UnitConfigName": "Statue_B"},
            {"Translate": [2500.0, 0.0, -3999.9]},
            {"Translate": [-9000.0, 0.0, 0.0]}
        ]"#,
    )
    .unwrap();

    let config = AppConfig::default();
    let beco = commands::open_map(&map, &config).unwrap();
    let placements = beco_io::load_placements(&statues).unwrap();
    let matches = commands::filter(&beco, &placements, &[7, 9], Some(points.as_path())).unwrap();
    let written: Vec<(f64, f64)> = beco_io::read_json_file(&points).unwrap();
    for path in [&map, &statues, &points] {
        std::fs::remove_file(path).ok();
    }

    assert_eq!(matches.skipped, 1);
    assert_eq!(written, vec![(-4999.0, -4000.0), (2500.0, -3999.9)]);
}

#[test]
fn test_config_frame_applies_to_queries() {
    let map = temp_path("frame.beco");
    beco_io::save_beco(&two_area_row(ByteOrder::Big), &map).unwrap();

    let config = AppConfig::from_toml("[frame]\nx_origin = 0.0\nz_origin = 0.0\n").unwrap();
    assert_eq!(
        config.frame,
        CoordinateFrame {
            x_origin: 0.0,
            z_origin: 0.0
        }
    );
    let beco = commands::open_map(&map, &config).unwrap();
    std::fs::remove_file(&map).ok();

    assert_eq!(commands::query(&beco, 0.0, 0.0).unwrap(), 7);
    assert_eq!(commands::query(&beco, 5000.0, 0.0).unwrap(), 9);
    assert!(commands::query(&beco, -1.0, 0.0).is_err());
}

#[test]
fn test_placement_helpers() {
    let placement = Placement::new(1.0, 2.0, 3.0);
    assert_eq!((placement.x(), placement.z()), (1.0, 3.0));
}
