use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, PointerEvent, Window};

use inkmark_shared::{CanvasOrigin, Contact, Point, RawPosition, SurfaceConfig};

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn debug_enabled(window: &Window) -> bool {
    let search = window.location().search().ok().unwrap_or_default();
    search.contains("debug=1") || search.contains("debug=true")
}

pub fn set_status(status_el: &Element, state: &str, text: &str) {
    let _ = status_el.set_attribute("data-state", state);
    status_el.set_text_content(Some(text));
}

fn attribute_u32(canvas: &HtmlCanvasElement, name: &str) -> Option<u32> {
    canvas.get_attribute(name)?.trim().parse().ok()
}

/// Bounds come from `data-max-width` / `data-max-height` on the canvas.
pub fn surface_config(canvas: &HtmlCanvasElement) -> SurfaceConfig {
    let mut config = SurfaceConfig::default();
    if let Some(width) = attribute_u32(canvas, "data-max-width") {
        config.max_width = width;
    }
    if let Some(height) = attribute_u32(canvas, "data-max-height") {
        config.max_height = height;
    }
    if let Some(caption) = canvas.get_attribute("data-caption") {
        config.placeholder_caption = caption;
    }
    config
}

pub fn contact(event: &PointerEvent) -> Contact {
    if event.is_primary() && event.button() == 0 {
        Contact::Primary
    } else {
        Contact::Secondary
    }
}

/// Maps a pointer event into canvas space. The bounding rect is read per
/// event because scrolling moves the canvas.
pub fn event_to_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    CanvasOrigin::new(rect.left(), rect.top()).to_canvas(RawPosition::new(
        event.client_x() as f64,
        event.client_y() as f64,
    ))
}

/// The event plus any positions the browser merged into it, oldest first.
pub fn coalesced_events(event: &PointerEvent) -> Vec<PointerEvent> {
    let get_coalesced_events =
        Reflect::get(event.as_ref(), &JsValue::from_str("getCoalescedEvents"))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok());
    let mut out = Vec::new();
    if let Some(get_coalesced_events) = get_coalesced_events {
        if let Ok(events) = get_coalesced_events
            .call0(event.as_ref())
            .and_then(|value| value.dyn_into::<js_sys::Array>())
        {
            out.reserve(events.length() as usize);
            for index in 0..events.length() {
                if let Ok(event) = events.get(index).dyn_into::<PointerEvent>() {
                    out.push(event);
                }
            }
        }
    }
    if out.is_empty() {
        out.push(event.clone());
    }
    out
}
