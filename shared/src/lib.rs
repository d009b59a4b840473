//! Freehand annotation surface: load a raster, mark it with pointer strokes,
//! export the flattened composite.

pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod loader;
pub mod recorder;
pub mod render;
pub mod stroke;
pub mod surface;

pub use config::SurfaceConfig;
pub use error::{DecodeError, ExportError, GeometryError};
pub use export::{ExportFormat, ExportedImage};
pub use geometry::{CanvasOrigin, DisplayScale, Point, RawPosition, Size};
pub use loader::{Bitmap, LoadCompletion, LoadOutcome, LoadRequest, LoadTicket};
pub use recorder::{Contact, StrokeRecorder, Transition};
pub use render::{Frame, Placeholder, Renderer, Scene};
pub use stroke::Stroke;
pub use surface::AnnotationSurface;
