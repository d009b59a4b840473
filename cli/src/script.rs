//! Stroke scripts: JSON lists of canvas-local polylines replayed as pointer
//! gestures.

use anyhow::{bail, Result};
use serde::Deserialize;

use inkmark_shared::{AnnotationSurface, Contact, Point};

#[derive(Deserialize)]
struct ScriptFile {
    strokes: Vec<Vec<Point>>,
}

/// Accepts `{"strokes": [[{"x":..,"y":..}, ..], ..]}` or the bare array.
pub fn parse_stroke_script(text: &str) -> Result<Vec<Vec<Point>>> {
    if let Ok(ScriptFile { strokes }) = serde_json::from_str::<ScriptFile>(text) {
        return Ok(strokes);
    }
    match serde_json::from_str::<Vec<Vec<Point>>>(text) {
        Ok(strokes) => Ok(strokes),
        Err(error) => bail!("invalid stroke script: {error}"),
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub committed: usize,
    pub discarded: usize,
}

pub fn replay(surface: &mut AnnotationSurface, strokes: &[Vec<Point>]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for stroke in strokes {
        let Some((first, rest)) = stroke.split_first() else {
            continue;
        };
        let before = surface.committed_strokes().len();
        surface.pointer_down(*first, Contact::Primary);
        for point in rest {
            surface.pointer_move(*point);
        }
        surface.pointer_up();
        if surface.committed_strokes().len() > before {
            summary.committed += 1;
        } else {
            summary.discarded += 1;
        }
    }
    summary
}
