use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, Rgb, RgbImage, RgbaImage};
use tiny_skia::Pixmap;

use crate::error::{ExportError, ExportResult};
use crate::render::Frame;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Png,
    /// Lossy; transparent pixels are flattened onto white.
    Jpeg { quality: u8 },
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg { .. } => "image/jpeg",
        }
    }
}

/// One encoded snapshot of the composite.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportedImage {
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
    bytes: Vec<u8>,
}

impl ExportedImage {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Encodes the last rendered frame. A placeholder frame means no image is
/// loaded, which exports nothing.
pub fn export_frame(frame: &Frame, format: ExportFormat) -> ExportResult<Option<ExportedImage>> {
    let Some(raster) = frame.raster() else {
        return Ok(None);
    };
    let image = raster_to_rgba(raster);
    let bytes = match format {
        ExportFormat::Png => encode_png(&image)?,
        ExportFormat::Jpeg { quality } => encode_jpeg(&image, quality)?,
    };
    Ok(Some(ExportedImage {
        format,
        width: image.width(),
        height: image.height(),
        bytes,
    }))
}

pub fn raster_to_rgba(raster: &Pixmap) -> RgbaImage {
    let mut data = Vec::with_capacity(raster.data().len());
    for pixel in raster.pixels() {
        let color = pixel.demultiply();
        data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    RgbaImage::from_raw(raster.width(), raster.height(), data)
        .unwrap_or_else(|| RgbaImage::new(raster.width(), raster.height()))
}

fn encode_png(image: &RgbaImage) -> ExportResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

fn encode_jpeg(image: &RgbaImage, quality: u8) -> ExportResult<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(ExportError::InvalidQuality(quality));
    }
    let flattened = RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let over_white = |channel: u8| -> u8 {
            let alpha = a as u32;
            ((channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([over_white(r), over_white(g), over_white(b)])
    });
    let mut bytes = Vec::new();
    flattened.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality))?;
    Ok(bytes)
}
