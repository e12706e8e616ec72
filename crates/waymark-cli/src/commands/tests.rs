use std::fs;

use anyhow::Context;
use tempfile::tempdir;
use waymark_core::config::{PointerConfig, RankerKind, RankingConfig};
use waymark_core::geometry::{PixelSize, Point, ScreenOffset, Side};
use waymark_core::models::Language;
use waymark_core::{SqliteMarkerStore, WaymarkError};

use super::pointer::{PointerReport, compute_pointer, resolve_target};
use super::support::failure_payload;
use super::{load_catalog, ranking_config, search};
use crate::cli::{ImportArgs, PointerArgs, SearchArgs};

const CATALOG_JSON: &str = r#"{
    "maps": [
        {"id": 1, "internal_name": "main", "floor_width": 1000, "floor_height": 1000,
         "tile_size": 250, "levels_num": 2, "floors_num": 1}
    ],
    "markers": [
        {"id": 1, "map_id": 1, "marker_type": "ROOM", "floor": 1, "x": 0.2, "y": 0.2},
        {"id": 2, "map_id": 1, "marker_type": "ELEVATOR", "floor": 1, "x": 0.8, "y": 0.8}
    ],
    "texts": [
        {"marker_id": 1, "language": "en", "title": "Dean office", "description": "Office of the dean"},
        {"marker_id": 2, "language": "en", "title": "Elevator", "location": "Near the dean office"}
    ]
}"#;

fn search_args(query: &str) -> SearchArgs {
    SearchArgs {
        query: query.to_string(),
        map_id: 1,
        language: Language::En,
        limit: 10,
        ranker: None,
        bm25_b: None,
        bm25_k1: None,
    }
}

fn pointer_args(pin_x: f64, pin_y: f64) -> PointerArgs {
    PointerArgs {
        center_x: 0.5,
        center_y: 0.5,
        scale: 1.0,
        rotation: 0.0,
        map_width: Some(1000),
        map_height: Some(1000),
        map_id: None,
        marker_id: None,
        layout_width: 1000,
        layout_height: 1000,
        pin_x: Some(pin_x),
        pin_y: Some(pin_y),
        indicator_size: 40,
        epsilon: None,
    }
}

#[test]
fn imported_catalog_is_searchable() {
    let temp = tempdir().expect("tempdir");
    let catalog_path = temp.path().join("catalog.json");
    fs::write(&catalog_path, CATALOG_JSON).expect("write catalog");

    let store = SqliteMarkerStore::open(temp.path().join("markers.db")).expect("open store");
    let catalog = load_catalog(&ImportArgs {
        catalog: catalog_path,
    })
    .expect("load catalog");
    store.insert_catalog(&catalog).expect("insert catalog");

    let hits = search(
        &store,
        &search_args("dean office"),
        RankingConfig::default(),
    )
    .expect("search");
    let ids = hits.iter().map(|hit| hit.marker.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![1, 2]);

    let mut limited = search_args("dean");
    limited.limit = 1;
    let top = search(&store, &limited, RankingConfig::default()).expect("search");
    assert_eq!(top.len(), 1);
}

#[test]
fn missing_catalog_reports_io_code_with_context() {
    let temp = tempdir().expect("tempdir");
    let err = load_catalog(&ImportArgs {
        catalog: temp.path().join("absent.json"),
    })
    .expect_err("file is missing");
    let payload = failure_payload("import", &err);
    assert_eq!(payload.code, "IO_ERROR");
    assert_eq!(payload.operation, "import");
    assert!(payload.message.contains("failed to read marker catalog"));
}

#[test]
fn invalid_catalog_reports_json_code() {
    let temp = tempdir().expect("tempdir");
    let catalog_path = temp.path().join("catalog.json");
    fs::write(&catalog_path, "{\"markers\": 3}").expect("write catalog");
    let err = load_catalog(&ImportArgs {
        catalog: catalog_path,
    })
    .expect_err("markers must be an array");
    assert_eq!(failure_payload("import", &err).code, "JSON_ERROR");
}

#[test]
fn failure_payload_finds_wrapped_core_errors() {
    let err = Err::<(), _>(WaymarkError::NotFound("marker 9".to_string()))
        .context("show failed")
        .expect_err("error");
    let payload = failure_payload("show", &err);
    assert_eq!(payload.code, "NOT_FOUND");
    assert!(payload.message.starts_with("show failed: "));

    let plain = anyhow::anyhow!("something else");
    assert_eq!(failure_payload("show", &plain).code, "INTERNAL_ERROR");
}

#[test]
fn flags_override_environment_ranking() {
    let mut args = search_args("x");
    args.ranker = Some(RankerKind::TfIdf);
    args.bm25_k1 = Some(2.0);
    let config = ranking_config(RankingConfig::default(), &args);
    assert_eq!(config.kind, RankerKind::TfIdf);
    assert!((config.bm25_k1 - 2.0).abs() < f64::EPSILON);
    assert!((config.bm25_b - RankingConfig::default().bm25_b).abs() < f64::EPSILON);
}

fn catalog_store() -> SqliteMarkerStore {
    let store = SqliteMarkerStore::open_in_memory().expect("open store");
    let catalog = serde_json::from_str(CATALOG_JSON).expect("parse catalog");
    store.insert_catalog(&catalog).expect("insert catalog");
    store
}

fn report_for(args: &PointerArgs) -> waymark_core::Result<Option<PointerReport>> {
    let target = resolve_target(args, None)?;
    compute_pointer(args, target, PointerConfig::default())
}

#[test]
fn pointer_report_places_glyph_on_right_edge() {
    let report = report_for(&pointer_args(2.0, 0.5))
        .expect("pointer")
        .expect("pin is off screen");
    assert_eq!(report.side, Side::Right);
    assert!(report.heading.abs() < 1e-3);
    assert!(report.screen_rotation.abs() > 89.0);
    assert_eq!(report.coordinates, ScreenOffset { x: 960, y: 480 });
}

#[test]
fn pointer_report_is_none_for_visible_pin() {
    let report = report_for(&pointer_args(0.3, 0.7)).expect("pointer");
    assert_eq!(report, None);
}

#[test]
fn pointer_rejects_epsilon_outside_range() {
    let mut args = pointer_args(2.0, 0.5);
    args.epsilon = Some(0.7);
    let err = report_for(&args).expect_err("epsilon too large");
    assert_eq!(err.code(), "VALIDATION_FAILED");
}

#[test]
fn pointer_target_uses_stored_map_size_and_marker_position() {
    let store = catalog_store();
    let mut args = pointer_args(0.0, 0.0);
    args.map_width = None;
    args.map_height = None;
    args.pin_x = None;
    args.pin_y = None;
    args.marker_id = Some(2);

    let target = resolve_target(&args, Some(&store)).expect("target");
    assert_eq!(target.full_map_size, PixelSize::new(1000, 1000));
    assert_eq!(target.pin, Point::new(0.8, 0.8));

    args.center_x = 0.1;
    args.center_y = 0.8;
    let report = compute_pointer(&args, target, PointerConfig::default())
        .expect("pointer")
        .expect("marker is off screen");
    assert_eq!(report.side, Side::Right);
}

#[test]
fn explicit_map_size_wins_over_stored_info() {
    let store = catalog_store();
    let mut args = pointer_args(0.25, 0.75);
    args.map_id = Some(1);
    args.map_width = Some(4000);
    args.map_height = Some(2000);
    let target = resolve_target(&args, Some(&store)).expect("target");
    assert_eq!(target.full_map_size, PixelSize::new(4000, 2000));
    assert_eq!(target.pin, Point::new(0.25, 0.75));
}

#[test]
fn pointer_target_errors_are_reported() {
    let store = catalog_store();

    let mut unknown_map = pointer_args(0.5, 0.5);
    unknown_map.map_width = None;
    unknown_map.map_height = None;
    unknown_map.map_id = Some(9);
    let err = resolve_target(&unknown_map, Some(&store)).expect_err("no map info");
    assert_eq!(err.code(), "NOT_FOUND");

    let mut mismatch = pointer_args(0.5, 0.5);
    mismatch.map_id = Some(2);
    mismatch.marker_id = Some(1);
    let err = resolve_target(&mismatch, Some(&store)).expect_err("marker on map 1");
    assert_eq!(err.code(), "VALIDATION_FAILED");

    let mut no_size = pointer_args(0.5, 0.5);
    no_size.map_width = None;
    no_size.map_height = None;
    let err = resolve_target(&no_size, None).expect_err("size unknown");
    assert_eq!(err.code(), "VALIDATION_FAILED");
}

