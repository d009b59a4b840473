use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Canvas-local position; origin is the top-left of the displayed bitmap.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

pub fn normalize_point(point: Point) -> Option<Point> {
    if !point.x.is_finite() || !point.y.is_finite() {
        return None;
    }
    Some(point)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Uniform shrink factor fitting a natural size inside display bounds.
///
/// The factor is `min(bounds.w / natural.w, bounds.h / natural.h, 1.0)`, so
/// small images keep their native size and large ones shrink with their
/// aspect ratio intact. Display dimensions round to the nearest pixel and
/// never drop below one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayScale {
    pub factor: f64,
    pub natural: Size,
    pub display: Size,
}

impl DisplayScale {
    pub fn fit(natural: Size, bounds: Size) -> Result<Self, GeometryError> {
        if natural.is_empty() {
            return Err(GeometryError::InvalidNaturalSize {
                width: natural.width,
                height: natural.height,
            });
        }
        validate_bounds(bounds)?;
        let factor = (bounds.width as f64 / natural.width as f64)
            .min(bounds.height as f64 / natural.height as f64)
            .min(1.0);
        Ok(Self {
            factor,
            natural,
            display: Size {
                width: scale_axis(natural.width, factor),
                height: scale_axis(natural.height, factor),
            },
        })
    }
}

fn scale_axis(length: u32, factor: f64) -> u32 {
    ((length as f64 * factor).round() as u32).max(1)
}

pub fn validate_bounds(bounds: Size) -> Result<Size, GeometryError> {
    if bounds.is_empty() {
        return Err(GeometryError::InvalidBounds {
            width: bounds.width,
            height: bounds.height,
        });
    }
    Ok(bounds)
}

/// Pointer position in viewport coordinates, as reported by the host for a
/// mouse event or the first active touch contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawPosition {
    pub x: f64,
    pub y: f64,
}

impl RawPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Top-left of the canvas on screen. Layout and scrolling move it, so hosts
/// should read it fresh for every event.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CanvasOrigin {
    pub left: f64,
    pub top: f64,
}

impl CanvasOrigin {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    pub fn to_canvas(self, raw: RawPosition) -> Point {
        Point {
            x: (raw.x - self.left) as f32,
            y: (raw.y - self.top) as f32,
        }
    }
}
