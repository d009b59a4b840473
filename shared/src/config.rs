use serde::Deserialize;

pub const DEFAULT_MAX_WIDTH: u32 = 800;
pub const DEFAULT_MAX_HEIGHT: u32 = 600;
pub const DEFAULT_CAPTION: &str = "Upload an image to start marking";

/// Host-supplied settings for an annotation surface.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SurfaceConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// Text shown centered in the placeholder while no image is loaded.
    pub placeholder_caption: String,
}

impl SurfaceConfig {
    pub fn with_bounds(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
            ..Self::default()
        }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            placeholder_caption: DEFAULT_CAPTION.to_string(),
        }
    }
}
