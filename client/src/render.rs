use wasm_bindgen::{Clamped, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use inkmark_shared::export::raster_to_rgba;
use inkmark_shared::{Frame, Placeholder};

use crate::state::State;

fn css_rgba([r, g, b, a]: [u8; 4]) -> String {
    format!("rgba({r}, {g}, {b}, {:.3})", a as f64 / 255.0)
}

/// Setting a canvas dimension wipes its content, so only touch them when
/// they actually change.
fn fit_canvas(canvas: &HtmlCanvasElement, width: u32, height: u32) {
    if canvas.width() != width {
        canvas.set_width(width);
    }
    if canvas.height() != height {
        canvas.set_height(height);
    }
}

fn paint_placeholder(
    ctx: &CanvasRenderingContext2d,
    placeholder: &Placeholder,
) -> Result<(), JsValue> {
    let width = placeholder.width as f64;
    let height = placeholder.height as f64;
    ctx.set_fill_style_str(&css_rgba(placeholder.background));
    ctx.fill_rect(0.0, 0.0, width, height);
    ctx.set_fill_style_str(&css_rgba(placeholder.text_color));
    ctx.set_font("16px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(&placeholder.caption, width / 2.0, height / 2.0)
}

/// Copies the surface's current frame onto the canvas.
pub fn paint(state: &State) {
    let result = match state.surface.frame() {
        Frame::Placeholder(placeholder) => {
            fit_canvas(&state.canvas, placeholder.width, placeholder.height);
            paint_placeholder(&state.ctx, placeholder)
        }
        Frame::Composite(raster) => {
            fit_canvas(&state.canvas, raster.width(), raster.height());
            let pixels = raster_to_rgba(raster);
            ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(pixels.as_raw().as_slice()),
                pixels.width(),
                pixels.height(),
            )
            .and_then(|data| state.ctx.put_image_data(&data, 0.0, 0.0))
        }
    };
    if let Err(error) = result {
        web_sys::console::error_1(&error);
    }
}
