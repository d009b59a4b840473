use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use image::{ImageFormat, Rgba, RgbaImage};
use inkmark_shared::{AnnotationSurface, Contact, Point, SurfaceConfig};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

pub fn png_bytes(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, color);
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("encode fixture");
    buffer.into_inner()
}

pub fn surface(max_width: u32, max_height: u32) -> AnnotationSurface {
    AnnotationSurface::new(SurfaceConfig::with_bounds(max_width, max_height))
        .expect("valid bounds")
}

/// Surface with an observer that records every selection notification.
pub fn observed_surface(
    max_width: u32,
    max_height: u32,
) -> (AnnotationSurface, Rc<RefCell<Vec<bool>>>) {
    let mut surface = surface(max_width, max_height);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    surface.on_selection_changed(move |exists| sink.borrow_mut().push(exists));
    (surface, seen)
}

pub fn draw(surface: &mut AnnotationSurface, points: &[(f32, f32)]) {
    let mut iter = points.iter();
    if let Some(&(x, y)) = iter.next() {
        surface.pointer_down(Point::new(x, y), Contact::Primary);
    }
    for &(x, y) in iter {
        surface.pointer_move(Point::new(x, y));
    }
    surface.pointer_up();
}
