//! Unit tests for display scaling and pointer mapping.

use inkmark_shared::{CanvasOrigin, DisplayScale, GeometryError, Point, RawPosition, Size};

#[test]
fn test_large_image_shrinks_to_tightest_axis() {
    let scale = DisplayScale::fit(Size::new(2000, 1000), Size::new(800, 600)).unwrap();
    assert!((scale.factor - 0.4).abs() < 1e-12);
    assert_eq!(scale.display, Size::new(800, 400));
}

#[test]
fn test_small_image_is_never_upscaled() {
    let scale = DisplayScale::fit(Size::new(120, 90), Size::new(800, 600)).unwrap();
    assert_eq!(scale.factor, 1.0);
    assert_eq!(scale.display, Size::new(120, 90));
}

#[test]
fn test_tall_image_limited_by_height() {
    let scale = DisplayScale::fit(Size::new(600, 1200), Size::new(800, 600)).unwrap();
    assert!((scale.factor - 0.5).abs() < 1e-12);
    assert_eq!(scale.display, Size::new(300, 600));
}

#[test]
fn test_scale_properties_hold_across_sizes() {
    let naturals = [(1, 1), (7, 3), (801, 599), (4000, 10), (10, 4000), (1920, 1080), (800, 600)];
    let bounds = [(1, 1), (800, 600), (320, 240), (1024, 1024)];
    for &(nw, nh) in &naturals {
        for &(bw, bh) in &bounds {
            let scale = DisplayScale::fit(Size::new(nw, nh), Size::new(bw, bh)).unwrap();
            assert!(scale.factor > 0.0 && scale.factor <= 1.0);
            let expected_w = ((nw as f64 * scale.factor).round() as u32).max(1);
            let expected_h = ((nh as f64 * scale.factor).round() as u32).max(1);
            assert_eq!(scale.display, Size::new(expected_w, expected_h));
            assert!(scale.display.width <= bw.max(1) && scale.display.height <= bh.max(1));
        }
    }
}

#[test]
fn test_zero_dimensions_are_rejected() {
    assert_eq!(
        DisplayScale::fit(Size::new(0, 10), Size::new(800, 600)),
        Err(GeometryError::InvalidNaturalSize { width: 0, height: 10 })
    );
    assert_eq!(
        DisplayScale::fit(Size::new(10, 10), Size::new(800, 0)),
        Err(GeometryError::InvalidBounds { width: 800, height: 0 })
    );
}

#[test]
fn test_raw_position_maps_relative_to_canvas_origin() {
    let origin = CanvasOrigin::new(40.0, 125.5);
    let point = origin.to_canvas(RawPosition::new(50.0, 135.5));
    assert_eq!(point, Point::new(10.0, 10.0));
}

#[test]
fn test_origin_change_moves_mapping() {
    let raw = RawPosition::new(300.0, 300.0);
    let before = CanvasOrigin::new(100.0, 100.0).to_canvas(raw);
    let after_scroll = CanvasOrigin::new(100.0, -50.0).to_canvas(raw);
    assert_eq!(before, Point::new(200.0, 200.0));
    assert_eq!(after_scroll, Point::new(200.0, 350.0));
}
