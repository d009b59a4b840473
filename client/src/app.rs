use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Element, Event, FileReader, HtmlAnchorElement, HtmlButtonElement,
    HtmlCanvasElement, HtmlInputElement, PointerEvent, ProgressEvent,
};

use inkmark_shared::{
    AnnotationSurface, DecodeError, LoadCompletion, LoadOutcome, LoadRequest, LoadTicket,
};

use crate::dom::{
    coalesced_events, contact, debug_enabled, event_to_point, get_element, set_status,
    surface_config,
};
use crate::export::download_composite;
use crate::render::paint;
use crate::state::{LoadingState, State};

fn read_bytes(event: &ProgressEvent) -> Option<Vec<u8>> {
    let reader: FileReader = event.target()?.dyn_into().ok()?;
    let buffer = reader.result().ok()?;
    if buffer.is_null() || buffer.is_undefined() {
        return None;
    }
    Some(js_sys::Uint8Array::new(&buffer).to_vec())
}

fn apply_completion(state: &mut State, status_el: &Element, completion: LoadCompletion) {
    match state.surface.finish_load(completion) {
        Ok(LoadOutcome::Loaded { display, .. }) => {
            state.log(&format!("Loaded image at {}x{}", display.width, display.height));
            set_status(
                status_el,
                "ready",
                &format!("{} × {}", display.width, display.height),
            );
        }
        Ok(LoadOutcome::Superseded) => {
            state.log("Ignoring a superseded image load");
            return;
        }
        Ok(LoadOutcome::Cleared) => set_status(status_el, "idle", "No image"),
        Err(error) => {
            web_sys::console::warn_1(&format!("Image load failed: {error}").into());
            set_status(status_el, "error", &error.to_string());
        }
    }
    paint(state);
}

fn start_load(
    state_rc: &Rc<RefCell<State>>,
    status_el: &Element,
    file: web_sys::File,
) -> Result<(), JsValue> {
    let reader = FileReader::new()?;
    let ticket: LoadTicket = state_rc.borrow_mut().surface.reserve_load();

    let onload_state = state_rc.clone();
    let onload_status = status_el.clone();
    let onload = Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
        let completion = match read_bytes(&event) {
            Some(bytes) => LoadRequest::new(ticket, bytes).decode(),
            None => LoadCompletion::new(ticket, Err(DecodeError::Empty)),
        };
        apply_completion(&mut onload_state.borrow_mut(), &onload_status, completion);
    });

    let onerror_state = state_rc.clone();
    let onerror_status = status_el.clone();
    let onerror = Closure::<dyn FnMut(ProgressEvent)>::new(move |_| {
        let failure = DecodeError::Malformed("file could not be read".to_string());
        let completion = LoadCompletion::new(ticket, Err(failure));
        apply_completion(&mut onerror_state.borrow_mut(), &onerror_status, completion);
    });

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    reader.read_as_array_buffer(&file)?;
    set_status(status_el, "loading", "Loading…");

    // Callbacks stay alive until the next load replaces them.
    state_rc.borrow_mut().loading = Some(LoadingState {
        reader,
        onload,
        onerror,
    });
    Ok(())
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas: HtmlCanvasElement = get_element(&document, "annotation-canvas")?;
    let image_input: HtmlInputElement = get_element(&document, "image-input")?;
    let clear_button: HtmlButtonElement = get_element(&document, "clear-button")?;
    let export_button: HtmlButtonElement = get_element(&document, "export-button")?;
    let export_link: HtmlAnchorElement = get_element(&document, "export-link")?;
    let status_el: Element = get_element(&document, "status")?;

    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let mut surface = AnnotationSurface::new(surface_config(&canvas))
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    export_button.set_disabled(true);
    let selection_button = export_button.clone();
    surface.on_selection_changed(move |exists| selection_button.set_disabled(!exists));

    let state = Rc::new(RefCell::new(State {
        canvas: canvas.clone(),
        ctx,
        surface,
        loading: None,
        active_pointer: None,
        debug: debug_enabled(&window),
    }));
    paint(&state.borrow());
    set_status(&status_el, "idle", "No image");

    {
        let change_state = state.clone();
        let change_input = image_input.clone();
        let change_status = status_el.clone();
        let onchange = Closure::<dyn FnMut(Event)>::new(move |_| {
            let file = change_input.files().and_then(|list| list.get(0));
            let previous = change_state.borrow_mut().loading.take();
            if let Some(previous) = previous {
                previous.cancel();
            }
            let Some(file) = file else {
                let mut state = change_state.borrow_mut();
                state.active_pointer = None;
                state.surface.request_load(None);
                paint(&state);
                set_status(&change_status, "idle", "No image");
                return;
            };
            if let Err(error) = start_load(&change_state, &change_status, file) {
                web_sys::console::error_1(&error);
            }
        });
        image_input.add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
        onchange.forget();
    }

    {
        let clear_state = state.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = clear_state.borrow_mut();
            state.active_pointer = None;
            state.surface.clear();
            paint(&state);
        });
        clear_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let export_state = state.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let state = export_state.borrow();
            if state.surface.is_drawing() {
                return;
            }
            match download_composite(&state.surface, &export_link) {
                Ok(true) => state.log("Exported annotated image"),
                Ok(false) => state.log("Nothing to export"),
                Err(error) => web_sys::console::error_1(&error),
            }
        });
        export_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let down_state = state.clone();
        let down_canvas = canvas.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = down_state.borrow_mut();
            if state.active_pointer.is_some() {
                return;
            }
            let point = event_to_point(&down_canvas, &event);
            state.surface.pointer_down(point, contact(&event));
            if state.surface.is_drawing() {
                event.prevent_default();
                state.active_pointer = Some(event.pointer_id());
                paint(&state);
            }
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let move_canvas = canvas.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = move_state.borrow_mut();
            if state.active_pointer != Some(event.pointer_id()) {
                return;
            }
            event.prevent_default();
            for sample in coalesced_events(&event) {
                let point = event_to_point(&move_canvas, &sample);
                state.surface.pointer_move(point);
            }
            paint(&state);
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let stop_state = state.clone();
        let onstop = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = stop_state.borrow_mut();
            if state.active_pointer != Some(event.pointer_id()) {
                return;
            }
            state.active_pointer = None;
            match event.type_().as_str() {
                "pointerleave" => state.surface.pointer_leave(),
                "pointercancel" => state.surface.pointer_cancel(),
                _ => state.surface.pointer_up(),
            }
            let strokes = state.surface.committed_strokes().len();
            state.log(&format!("Gesture ended, {strokes} stroke(s) committed"));
            paint(&state);
        });
        canvas.add_event_listener_with_callback("pointerup", onstop.as_ref().unchecked_ref())?;
        canvas
            .add_event_listener_with_callback("pointercancel", onstop.as_ref().unchecked_ref())?;
        canvas.add_event_listener_with_callback("pointerleave", onstop.as_ref().unchecked_ref())?;
        onstop.forget();
    }

    state.borrow().log("Annotation surface ready");
    Ok(())
}
