//! The annotation session and the operations a host drives it with.
//!
//! Every public operation ends in `flush`, which renders a new frame when the
//! operation changed anything visible. The renderer itself never looks at
//! pointer events or load tickets.

use tracing::debug;

use crate::config::SurfaceConfig;
use crate::error::{DecodeError, DecodeResult, ExportResult, GeometryError};
use crate::export::{export_frame, ExportFormat, ExportedImage};
use crate::geometry::{validate_bounds, DisplayScale, Point, Size};
use crate::loader::{Bitmap, LoadCompletion, LoadOutcome, LoadRequest, LoadTicket};
use crate::recorder::{Contact, StrokeRecorder, Transition};
use crate::render::{Backdrop, Frame, Renderer, Scene};
use crate::stroke::Stroke;

type SelectionObserver = Box<dyn FnMut(bool)>;

pub struct AnnotationSurface {
    bounds: Size,
    caption: String,
    bitmap: Option<Bitmap>,
    backdrop: Option<Backdrop>,
    recorder: StrokeRecorder,
    renderer: Renderer,
    last_ticket: Option<LoadTicket>,
    pending: Option<LoadTicket>,
    selection_exists: bool,
    observer: Option<SelectionObserver>,
    dirty: bool,
}

impl AnnotationSurface {
    pub fn new(config: SurfaceConfig) -> Result<Self, GeometryError> {
        let bounds = validate_bounds(Size::new(config.max_width, config.max_height))?;
        let mut surface = Self {
            bounds,
            caption: config.placeholder_caption,
            bitmap: None,
            backdrop: None,
            recorder: StrokeRecorder::new(),
            renderer: Renderer::new(),
            last_ticket: None,
            pending: None,
            selection_exists: false,
            observer: None,
            dirty: true,
        };
        surface.flush();
        Ok(surface)
    }

    /// Registers the callback told whether any committed stroke exists.
    pub fn on_selection_changed(&mut self, observer: impl FnMut(bool) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn has_bitmap(&self) -> bool {
        self.bitmap.is_some()
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    pub fn display_scale(&self) -> Option<DisplayScale> {
        self.backdrop.as_ref().map(Backdrop::scale)
    }

    pub fn committed_strokes(&self) -> &[Stroke] {
        self.recorder.committed()
    }

    pub fn active_stroke(&self) -> Option<&[Point]> {
        self.recorder.active()
    }

    pub fn is_drawing(&self) -> bool {
        self.recorder.is_drawing()
    }

    pub fn selection_exists(&self) -> bool {
        self.selection_exists
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn frame(&self) -> &Frame {
        self.renderer.frame()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Starts loading a new source and supersedes any load still in flight.
    ///
    /// An absent source empties the session, bitmap included, and returns
    /// `None`. The current image and strokes otherwise stay in place until
    /// the returned request's completion is handed to [`Self::finish_load`].
    pub fn request_load(&mut self, source: Option<Vec<u8>>) -> Option<LoadRequest> {
        let Some(bytes) = source else {
            self.last_ticket = Some(LoadTicket::after(self.last_ticket));
            self.pending = None;
            self.discard_image();
            self.flush();
            return None;
        };
        let ticket = self.reserve_load();
        debug!(generation = ticket.generation(), bytes = bytes.len(), "load requested");
        Some(LoadRequest::new(ticket, bytes))
    }

    /// Claims a ticket before the bytes are available, for hosts whose reads
    /// are themselves asynchronous. Supersedes any load in flight.
    pub fn reserve_load(&mut self) -> LoadTicket {
        let ticket = LoadTicket::after(self.last_ticket);
        self.last_ticket = Some(ticket);
        self.pending = Some(ticket);
        ticket
    }

    /// Applies a finished decode. Completions for anything but the latest
    /// request are ignored.
    pub fn finish_load(&mut self, completion: LoadCompletion) -> DecodeResult<LoadOutcome> {
        let (ticket, result) = completion.into_parts();
        if self.pending != Some(ticket) {
            debug!(generation = ticket.generation(), "stale load completion ignored");
            return Ok(LoadOutcome::Superseded);
        }
        self.pending = None;
        let outcome = result.and_then(|bitmap| self.install(bitmap));
        if outcome.is_err() {
            self.discard_image();
        }
        self.flush();
        outcome
    }

    /// Loads synchronously. `None` behaves like [`Self::request_load`] with
    /// an absent source.
    pub fn load_image(&mut self, source: Option<Vec<u8>>) -> DecodeResult<LoadOutcome> {
        match self.request_load(source) {
            Some(request) => self.finish_load(request.decode()),
            None => Ok(LoadOutcome::Cleared),
        }
    }

    /// Changes the display bounds. Strokes are rescaled so they stay over
    /// the same part of the image.
    pub fn set_bounds(&mut self, max_width: u32, max_height: u32) -> Result<(), GeometryError> {
        let bounds = validate_bounds(Size::new(max_width, max_height))?;
        if bounds == self.bounds {
            return Ok(());
        }
        if let Some(bitmap) = &self.bitmap {
            let scale = DisplayScale::fit(bitmap.natural_size(), bounds)?;
            let backdrop = Backdrop::new(bitmap, scale).ok_or(GeometryError::RasterTooLarge {
                width: scale.display.width,
                height: scale.display.height,
            })?;
            if let Some(previous) = self.display_scale() {
                self.recorder.rescale((scale.factor / previous.factor) as f32);
            }
            self.backdrop = Some(backdrop);
        }
        self.bounds = bounds;
        self.dirty = true;
        self.flush();
        Ok(())
    }

    pub fn pointer_down(&mut self, point: Point, contact: Contact) {
        let armed = self.has_bitmap();
        let transition = self.recorder.pointer_down(point, contact, armed);
        self.apply(transition);
    }

    pub fn pointer_move(&mut self, point: Point) {
        let armed = self.has_bitmap();
        let transition = self.recorder.pointer_move(point, armed);
        self.apply(transition);
    }

    pub fn pointer_up(&mut self) {
        self.end_gesture();
    }

    pub fn pointer_leave(&mut self) {
        self.end_gesture();
    }

    pub fn pointer_cancel(&mut self) {
        self.end_gesture();
    }

    /// Drops every stroke, finished or not.
    pub fn clear(&mut self) {
        self.recorder.reset();
        debug!("strokes cleared");
        self.publish_selection(false);
        self.dirty = true;
        self.flush();
    }

    /// Re-renders unconditionally. Output is identical while inputs are.
    pub fn render(&mut self) -> &Frame {
        self.dirty = true;
        self.flush();
        self.renderer.frame()
    }

    /// Encodes the last rendered frame as PNG, or returns `None` without an
    /// image. Meant to be called between gestures.
    pub fn get_annotated_image(&self) -> ExportResult<Option<ExportedImage>> {
        self.export_as(ExportFormat::Png)
    }

    pub fn export_as(&self, format: ExportFormat) -> ExportResult<Option<ExportedImage>> {
        export_frame(self.renderer.frame(), format)
    }

    fn end_gesture(&mut self) {
        let transition = self.recorder.finish();
        self.apply(transition);
    }

    fn apply(&mut self, transition: Transition) {
        if !transition.changed() {
            return;
        }
        if let Transition::Committed { count } = transition {
            self.publish_selection(count > 0);
        }
        self.dirty = true;
        self.flush();
    }

    fn install(&mut self, bitmap: Bitmap) -> DecodeResult<LoadOutcome> {
        let natural = bitmap.natural_size();
        let scale = DisplayScale::fit(natural, self.bounds).map_err(|_| DecodeError::ZeroSized)?;
        let backdrop = Backdrop::new(&bitmap, scale).ok_or(DecodeError::TooLarge {
            width: scale.display.width,
            height: scale.display.height,
        })?;
        self.bitmap = Some(bitmap);
        self.backdrop = Some(backdrop);
        self.recorder.reset();
        self.publish_selection(false);
        self.dirty = true;
        debug!(
            width = scale.display.width,
            height = scale.display.height,
            scale = scale.factor,
            "image installed"
        );
        Ok(LoadOutcome::Loaded {
            natural,
            display: scale.display,
            scale: scale.factor,
        })
    }

    fn discard_image(&mut self) {
        if self.bitmap.is_some() {
            debug!("image discarded");
        }
        self.bitmap = None;
        self.backdrop = None;
        self.recorder.reset();
        self.publish_selection(false);
        self.dirty = true;
    }

    /// Notifies only when the answer actually flips.
    fn publish_selection(&mut self, exists: bool) {
        if self.selection_exists == exists {
            return;
        }
        self.selection_exists = exists;
        if let Some(observer) = self.observer.as_mut() {
            observer(exists);
        }
    }

    fn flush(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        let scene = Scene {
            backdrop: self.backdrop.as_ref(),
            committed: self.recorder.committed(),
            active: self.recorder.active(),
            bounds: self.bounds,
            caption: &self.caption,
        };
        self.renderer.render(&scene);
    }
}
