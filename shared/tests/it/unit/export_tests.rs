//! Unit tests for composite export.

use image::{Rgba, RgbaImage};
use inkmark_shared::export::export_frame;
use inkmark_shared::render::Backdrop;
use inkmark_shared::{
    Bitmap, DisplayScale, ExportError, ExportFormat, Frame, Renderer, Scene, Size,
};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn composite(renderer: &mut Renderer, width: u32, height: u32) -> &Frame {
    let bitmap =
        Bitmap::from_rgba(RgbaImage::from_pixel(width, height, Rgba([10, 120, 200, 255]))).unwrap();
    let scale = DisplayScale::fit(bitmap.natural_size(), Size::new(width, height)).unwrap();
    let backdrop = Backdrop::new(&bitmap, scale).unwrap();
    renderer.render(&Scene {
        backdrop: Some(&backdrop),
        committed: &[],
        active: None,
        bounds: Size::new(width, height),
        caption: "",
    })
}

#[test]
fn test_placeholder_exports_nothing() {
    let mut renderer = Renderer::new();
    let frame = renderer.render(&Scene {
        backdrop: None,
        committed: &[],
        active: None,
        bounds: Size::new(800, 600),
        caption: "",
    });
    assert!(export_frame(frame, ExportFormat::Png).unwrap().is_none());
}

#[test]
fn test_png_export_round_trips_pixels() {
    let mut renderer = Renderer::new();
    let frame = composite(&mut renderer, 12, 7);
    let exported = export_frame(frame, ExportFormat::Png).unwrap().unwrap();

    assert_eq!((exported.width, exported.height), (12, 7));
    assert!(exported.bytes().starts_with(&PNG_MAGIC));
    let decoded = image::load_from_memory(exported.bytes()).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (12, 7));
    assert_eq!(decoded.get_pixel(3, 3), &Rgba([10, 120, 200, 255]));
}

#[test]
fn test_data_uri_prefix() {
    let mut renderer = Renderer::new();
    let frame = composite(&mut renderer, 4, 4);
    let exported = export_frame(frame, ExportFormat::Png).unwrap().unwrap();
    let uri = exported.to_data_uri();
    assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
}

#[test]
fn test_jpeg_export() {
    let mut renderer = Renderer::new();
    let frame = composite(&mut renderer, 16, 16);
    let exported = export_frame(frame, ExportFormat::Jpeg { quality: 85 })
        .unwrap()
        .unwrap();
    assert!(exported.bytes().starts_with(&[0xff, 0xd8]));
    assert!(exported.to_data_uri().starts_with("data:image/jpeg;base64,"));
}

#[test]
fn test_jpeg_quality_out_of_range() {
    let mut renderer = Renderer::new();
    let frame = composite(&mut renderer, 4, 4);
    assert!(matches!(
        export_frame(frame, ExportFormat::Jpeg { quality: 0 }),
        Err(ExportError::InvalidQuality(0))
    ));
    assert!(matches!(
        export_frame(frame, ExportFormat::Jpeg { quality: 101 }),
        Err(ExportError::InvalidQuality(101))
    ));
}
