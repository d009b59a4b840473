use tiny_skia::{
    Color, ColorU8, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke as Pen,
    Transform,
};
use tracing::{error, trace};

use crate::geometry::{DisplayScale, Point, Size};
use crate::loader::Bitmap;
use crate::stroke::{Stroke, STROKE_COLOR, STROKE_WIDTH};

pub const PLACEHOLDER_MIN_HEIGHT: u32 = 200;
pub const PLACEHOLDER_BACKGROUND: [u8; 4] = [243, 244, 246, 255];
pub const PLACEHOLDER_TEXT: [u8; 4] = [107, 114, 128, 255];

/// The bitmap resampled to its display size, premultiplied and ready to blit.
pub struct Backdrop {
    scale: DisplayScale,
    pixmap: Pixmap,
}

impl Backdrop {
    pub fn new(bitmap: &Bitmap, scale: DisplayScale) -> Option<Self> {
        let display = scale.display;
        let resized;
        let source = if display == bitmap.natural_size() {
            bitmap.pixels()
        } else {
            resized = image::imageops::resize(
                bitmap.pixels(),
                display.width,
                display.height,
                image::imageops::FilterType::Triangle,
            );
            &resized
        };
        let mut pixmap = Pixmap::new(display.width, display.height)?;
        for (target, pixel) in pixmap.pixels_mut().iter_mut().zip(source.pixels()) {
            let [r, g, b, a] = pixel.0;
            *target = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Some(Self { scale, pixmap })
    }

    pub fn scale(&self) -> DisplayScale {
        self.scale
    }

    pub fn display_size(&self) -> Size {
        self.scale.display
    }
}

/// Everything a frame depends on.
pub struct Scene<'a> {
    pub backdrop: Option<&'a Backdrop>,
    pub committed: &'a [Stroke],
    pub active: Option<&'a [Point]>,
    pub bounds: Size,
    pub caption: &'a str,
}

/// Shown while nothing is loaded. Hosts paint it themselves since text
/// layout belongs to them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Placeholder {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 4],
    pub text_color: [u8; 4],
    pub caption: String,
}

impl Placeholder {
    pub fn for_bounds(bounds: Size, caption: &str) -> Self {
        Self {
            width: bounds.width,
            height: (bounds.height / 2).max(PLACEHOLDER_MIN_HEIGHT),
            background: PLACEHOLDER_BACKGROUND,
            text_color: PLACEHOLDER_TEXT,
            caption: caption.to_string(),
        }
    }
}

pub enum Frame {
    Placeholder(Placeholder),
    Composite(Pixmap),
}

impl Frame {
    pub fn size(&self) -> Size {
        match self {
            Frame::Placeholder(placeholder) => Size::new(placeholder.width, placeholder.height),
            Frame::Composite(raster) => Size::new(raster.width(), raster.height()),
        }
    }

    pub fn raster(&self) -> Option<&Pixmap> {
        match self {
            Frame::Composite(raster) => Some(raster),
            Frame::Placeholder(_) => None,
        }
    }
}

/// Owns the single raster buffer frames are drawn into. The buffer is only
/// reallocated when the display size changes and is cleared otherwise.
pub struct Renderer {
    frame: Frame,
    spare: Option<Pixmap>,
    reallocations: u32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            frame: Frame::Placeholder(Placeholder::default()),
            spare: None,
            reallocations: 0,
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// How many times the raster buffer has been (re)allocated.
    pub fn reallocations(&self) -> u32 {
        self.reallocations
    }

    pub fn render(&mut self, scene: &Scene<'_>) -> &Frame {
        let Some(backdrop) = scene.backdrop else {
            self.park(Frame::Placeholder(Placeholder::for_bounds(scene.bounds, scene.caption)));
            return &self.frame;
        };
        let size = backdrop.display_size();
        let Some(mut raster) = self.acquire(size) else {
            error!(width = size.width, height = size.height, "raster allocation failed");
            self.park(Frame::Placeholder(Placeholder::for_bounds(scene.bounds, scene.caption)));
            return &self.frame;
        };
        raster.draw_pixmap(
            0,
            0,
            backdrop.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        for stroke in scene.committed {
            draw_polyline(&mut raster, stroke.points());
        }
        if let Some(active) = scene.active {
            draw_polyline(&mut raster, active);
        }
        trace!(
            strokes = scene.committed.len(),
            active = scene.active.map_or(0, <[Point]>::len),
            "frame rendered"
        );
        self.frame = Frame::Composite(raster);
        &self.frame
    }

    fn park(&mut self, next: Frame) {
        if let Frame::Composite(raster) = std::mem::replace(&mut self.frame, next) {
            self.spare = Some(raster);
        }
    }

    fn acquire(&mut self, size: Size) -> Option<Pixmap> {
        let parked = Frame::Placeholder(Placeholder::default());
        let previous = match std::mem::replace(&mut self.frame, parked) {
            Frame::Composite(raster) => Some(raster),
            Frame::Placeholder(_) => self.spare.take(),
        };
        match previous {
            Some(mut raster) if raster.width() == size.width && raster.height() == size.height => {
                raster.fill(Color::TRANSPARENT);
                Some(raster)
            }
            _ => {
                self.reallocations += 1;
                Pixmap::new(size.width, size.height)
            }
        }
    }
}

/// Strokes with fewer than two points draw nothing.
pub fn draw_polyline(raster: &mut Pixmap, points: &[Point]) {
    let [first, rest @ ..] = points else {
        return;
    };
    if rest.is_empty() {
        return;
    }
    let mut builder = PathBuilder::new();
    builder.move_to(first.x, first.y);
    for point in rest {
        builder.line_to(point.x, point.y);
    }
    let Some(path) = builder.finish() else {
        return;
    };
    let mut paint = Paint::default();
    let [r, g, b, a] = STROKE_COLOR;
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    let pen = Pen {
        width: STROKE_WIDTH,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Pen::default()
    };
    raster.stroke_path(&path, &paint, &pen, Transform::identity(), None);
}
