use wasm_bindgen::JsValue;
use web_sys::HtmlAnchorElement;

use inkmark_shared::AnnotationSurface;

pub const EXPORT_FILE_NAME: &str = "annotated.png";

/// Hands the composite to the browser as a download. Returns whether there
/// was anything to export.
pub fn download_composite(
    surface: &AnnotationSurface,
    link: &HtmlAnchorElement,
) -> Result<bool, JsValue> {
    let exported = surface
        .get_annotated_image()
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    let Some(exported) = exported else {
        return Ok(false);
    };
    link.set_href(&exported.to_data_uri());
    link.set_download(EXPORT_FILE_NAME);
    link.click();
    Ok(true)
}
