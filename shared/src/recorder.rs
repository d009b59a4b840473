use tracing::debug;

use crate::geometry::{normalize_point, Point};
use crate::stroke::Stroke;

/// Which input started a gesture. Only the primary mouse button or the first
/// touch contact may draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    Primary,
    Secondary,
}

enum DrawMode {
    Idle,
    Drawing { points: Vec<Point> },
}

/// What a pointer event did to the recorder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Ignored,
    Started,
    Extended,
    /// An active stroke was appended to the committed list, which now holds
    /// `count` strokes.
    Committed { count: usize },
    /// The gesture ended with fewer than two points and was dropped.
    Discarded,
}

impl Transition {
    pub fn changed(self) -> bool {
        !matches!(self, Transition::Ignored)
    }
}

pub struct StrokeRecorder {
    mode: DrawMode,
    committed: Vec<Stroke>,
}

impl Default for StrokeRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self {
            mode: DrawMode::Idle,
            committed: Vec::new(),
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.mode, DrawMode::Drawing { .. })
    }

    pub fn committed(&self) -> &[Stroke] {
        &self.committed
    }

    pub fn active(&self) -> Option<&[Point]> {
        match &self.mode {
            DrawMode::Drawing { points } => Some(points),
            DrawMode::Idle => None,
        }
    }

    /// `armed` is false while there is no bitmap to draw on.
    pub fn pointer_down(&mut self, point: Point, contact: Contact, armed: bool) -> Transition {
        if !armed || contact != Contact::Primary || self.is_drawing() {
            return Transition::Ignored;
        }
        let Some(point) = normalize_point(point) else {
            return Transition::Ignored;
        };
        self.mode = DrawMode::Drawing {
            points: vec![point],
        };
        Transition::Started
    }

    /// Repeated positions are dropped so a press that never moves stays a tap.
    pub fn pointer_move(&mut self, point: Point, armed: bool) -> Transition {
        if !armed {
            return Transition::Ignored;
        }
        let DrawMode::Drawing { points } = &mut self.mode else {
            return Transition::Ignored;
        };
        let Some(point) = normalize_point(point) else {
            return Transition::Ignored;
        };
        if points.last() == Some(&point) {
            return Transition::Ignored;
        }
        points.push(point);
        Transition::Extended
    }

    /// Ends the gesture on pointer up, leave or cancel.
    pub fn finish(&mut self) -> Transition {
        let DrawMode::Drawing { points } = std::mem::replace(&mut self.mode, DrawMode::Idle)
        else {
            return Transition::Ignored;
        };
        match Stroke::from_points(points) {
            Some(stroke) => {
                debug!(points = stroke.len(), "stroke committed");
                self.committed.push(stroke);
                Transition::Committed {
                    count: self.committed.len(),
                }
            }
            None => Transition::Discarded,
        }
    }

    pub fn reset(&mut self) {
        self.mode = DrawMode::Idle;
        self.committed.clear();
    }

    /// Moves every recorded point to a new display scale.
    pub(crate) fn rescale(&mut self, factor: f32) {
        for stroke in &mut self.committed {
            stroke.rescale(factor);
        }
        if let DrawMode::Drawing { points } = &mut self.mode {
            for point in points.iter_mut() {
                *point = point.scaled(factor);
            }
        }
    }
}
