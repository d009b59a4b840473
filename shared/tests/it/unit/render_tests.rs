//! Unit tests for the renderer and its raster buffer.

use image::{Rgba, RgbaImage};
use inkmark_shared::render::{Backdrop, PLACEHOLDER_MIN_HEIGHT};
use inkmark_shared::{
    Bitmap, Contact, DisplayScale, Frame, Point, Renderer, Scene, Size, StrokeRecorder,
};

fn backdrop(width: u32, height: u32, bounds: Size) -> Backdrop {
    let white = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let bitmap = Bitmap::from_rgba(white).unwrap();
    let scale = DisplayScale::fit(bitmap.natural_size(), bounds).unwrap();
    Backdrop::new(&bitmap, scale).unwrap()
}

fn recorded(strokes: &[&[(f32, f32)]]) -> StrokeRecorder {
    let mut recorder = StrokeRecorder::new();
    for stroke in strokes {
        let (first, rest) = stroke.split_first().unwrap();
        recorder.pointer_down(Point::new(first.0, first.1), Contact::Primary, true);
        for &(x, y) in rest {
            recorder.pointer_move(Point::new(x, y), true);
        }
        recorder.finish();
    }
    recorder
}

fn scene<'a>(
    backdrop: Option<&'a Backdrop>,
    recorder: &'a StrokeRecorder,
    active: Option<&'a [Point]>,
) -> Scene<'a> {
    Scene {
        backdrop,
        committed: recorder.committed(),
        active,
        bounds: Size::new(100, 100),
        caption: "Drop an image",
    }
}

fn raster_bytes(frame: &Frame) -> Vec<u8> {
    frame.raster().expect("composite frame").data().to_vec()
}

#[test]
fn test_placeholder_without_bitmap() {
    let mut renderer = Renderer::new();
    let recorder = recorded(&[&[(1.0, 1.0), (20.0, 20.0)]]);
    let frame = renderer.render(&scene(None, &recorder, None));

    let Frame::Placeholder(placeholder) = frame else {
        panic!("expected placeholder");
    };
    assert_eq!(placeholder.width, 100);
    assert!(placeholder.height >= PLACEHOLDER_MIN_HEIGHT);
    assert_eq!(placeholder.caption, "Drop an image");
    assert!(frame.raster().is_none());
}

#[test]
fn test_composite_matches_display_size() {
    let backdrop = backdrop(400, 200, Size::new(100, 100));
    let mut renderer = Renderer::new();
    let recorder = StrokeRecorder::new();
    let frame = renderer.render(&scene(Some(&backdrop), &recorder, None));
    assert_eq!(frame.size(), Size::new(100, 50));
}

#[test]
fn test_committed_stroke_is_drawn() {
    let backdrop = backdrop(40, 20, Size::new(100, 100));
    let recorder = recorded(&[&[(5.0, 10.0), (35.0, 10.0)]]);
    let mut renderer = Renderer::new();
    let frame = renderer.render(&scene(Some(&backdrop), &recorder, None));
    let raster = frame.raster().unwrap();

    let on_line = raster.pixel(20, 10).unwrap().demultiply();
    assert!(on_line.red() > 200);
    assert!(on_line.green() < 100);

    let far = raster.pixel(20, 1).unwrap().demultiply();
    assert_eq!((far.red(), far.green(), far.blue()), (255, 255, 255));
}

#[test]
fn test_single_point_active_stroke_draws_nothing() {
    let backdrop = backdrop(40, 20, Size::new(100, 100));
    let recorder = StrokeRecorder::new();
    let dot = [Point::new(20.0, 10.0)];
    let mut renderer = Renderer::new();

    let plain = raster_bytes(renderer.render(&scene(Some(&backdrop), &recorder, None)));
    let with_dot = raster_bytes(renderer.render(&scene(Some(&backdrop), &recorder, Some(&dot))));
    assert_eq!(plain, with_dot);
}

#[test]
fn test_active_stroke_uses_same_style() {
    let backdrop = backdrop(40, 20, Size::new(100, 100));
    let committed = recorded(&[&[(5.0, 10.0), (35.0, 10.0)]]);
    let empty = StrokeRecorder::new();
    let active = [Point::new(5.0, 10.0), Point::new(35.0, 10.0)];

    let mut renderer = Renderer::new();
    let as_committed = raster_bytes(renderer.render(&scene(Some(&backdrop), &committed, None)));
    let as_active = raster_bytes(renderer.render(&scene(Some(&backdrop), &empty, Some(&active))));
    assert_eq!(as_committed, as_active);
}

#[test]
fn test_rendering_is_idempotent_and_reuses_buffer() {
    let backdrop = backdrop(64, 48, Size::new(100, 100));
    let recorder = recorded(&[
        &[(2.0, 2.0), (60.0, 40.0), (10.0, 40.0)],
        &[(30.0, 5.0), (31.0, 44.0)],
    ]);
    let mut renderer = Renderer::new();

    let first = raster_bytes(renderer.render(&scene(Some(&backdrop), &recorder, None)));
    let second = raster_bytes(renderer.render(&scene(Some(&backdrop), &recorder, None)));
    assert_eq!(first, second);
    assert_eq!(renderer.reallocations(), 1);
}

#[test]
fn test_cleared_buffer_forgets_previous_strokes() {
    let backdrop = backdrop(40, 20, Size::new(100, 100));
    let marked = recorded(&[&[(5.0, 10.0), (35.0, 10.0)]]);
    let clean = StrokeRecorder::new();
    let mut renderer = Renderer::new();

    let baseline = raster_bytes(renderer.render(&scene(Some(&backdrop), &clean, None)));
    renderer.render(&scene(Some(&backdrop), &marked, None));
    let after = raster_bytes(renderer.render(&scene(Some(&backdrop), &clean, None)));
    assert_eq!(baseline, after);
    assert_eq!(renderer.reallocations(), 1);
}

#[test]
fn test_buffer_reallocated_only_on_size_change() {
    let small = backdrop(40, 20, Size::new(100, 100));
    let large = backdrop(80, 60, Size::new(100, 100));
    let recorder = StrokeRecorder::new();
    let mut renderer = Renderer::new();

    renderer.render(&scene(Some(&small), &recorder, None));
    renderer.render(&scene(None, &recorder, None));
    renderer.render(&scene(Some(&small), &recorder, None));
    assert_eq!(renderer.reallocations(), 1);

    renderer.render(&scene(Some(&large), &recorder, None));
    assert_eq!(renderer.reallocations(), 2);
    assert_eq!(renderer.frame().size(), Size::new(80, 60));
}
