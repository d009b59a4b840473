//! Error types for the annotation core.

use thiserror::Error;

/// Failure to turn an image source into a bitmap.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("image source is empty")]
    Empty,

    #[error("unrecognized image format")]
    UnknownFormat,

    #[error("malformed image data: {0}")]
    Malformed(String),

    #[error("image has zero width or height")]
    ZeroSized,

    /// Decoded fine but the display raster could not be allocated.
    #[error("image too large to display at {width}x{height}")]
    TooLarge { width: u32, height: u32 },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GeometryError {
    #[error("display bounds must be positive, got {width}x{height}")]
    InvalidBounds { width: u32, height: u32 },

    #[error("natural size must be positive, got {width}x{height}")]
    InvalidNaturalSize { width: u32, height: u32 },

    #[error("cannot allocate a {width}x{height} raster")]
    RasterTooLarge { width: u32, height: u32 },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("encode failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("jpeg quality must be within 1..=100, got {0}")]
    InvalidQuality(u8),
}

pub type DecodeResult<T> = Result<T, DecodeError>;
pub type ExportResult<T> = Result<T, ExportError>;
