use crate::geometry::Point;

pub const STROKE_COLOR: [u8; 4] = [239, 68, 68, 255];
pub const STROKE_WIDTH: f32 = 3.0;

/// A committed freehand mark. Only the recorder builds these, and only from
/// two or more points; vertex order is the order the pointer visited them.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    pub(crate) fn from_points(points: Vec<Point>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub(crate) fn rescale(&mut self, factor: f32) {
        for point in &mut self.points {
            *point = point.scaled(factor);
        }
    }
}
