use wasm_bindgen::prelude::Closure;
use web_sys::{CanvasRenderingContext2d, FileReader, HtmlCanvasElement, ProgressEvent};

use inkmark_shared::AnnotationSurface;

/// A file read in progress. Dropping it detaches the callbacks first so a
/// late event never reaches a freed closure.
pub struct LoadingState {
    pub reader: FileReader,
    pub onload: Closure<dyn FnMut(ProgressEvent)>,
    pub onerror: Closure<dyn FnMut(ProgressEvent)>,
}

impl LoadingState {
    pub fn cancel(self) {
        self.reader.set_onload(None);
        self.reader.set_onerror(None);
        if self.reader.ready_state() == FileReader::LOADING {
            self.reader.abort();
        }
    }
}

pub struct State {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub surface: AnnotationSurface,
    pub loading: Option<LoadingState>,
    /// Pointer that started the stroke being drawn.
    pub active_pointer: Option<i32>,
    pub debug: bool,
}

impl State {
    pub fn log(&self, message: &str) {
        if self.debug {
            web_sys::console::log_1(&message.into());
        }
    }
}
