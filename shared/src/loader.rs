use std::io::Cursor;

use image::{ImageError, ImageReader, RgbaImage};
use tracing::{debug, warn};

use crate::error::{DecodeError, DecodeResult};
use crate::geometry::Size;

/// A decoded image at its natural size.
#[derive(Clone, Debug)]
pub struct Bitmap {
    image: RgbaImage,
}

impl Bitmap {
    pub fn from_rgba(image: RgbaImage) -> DecodeResult<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(DecodeError::ZeroSized);
        }
        Ok(Self { image })
    }

    pub fn natural_size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.image
    }
}

/// Decodes any supported raster format, sniffing the content instead of
/// trusting a file name.
pub fn decode(bytes: &[u8]) -> DecodeResult<Bitmap> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|error| DecodeError::Malformed(error.to_string()))?;
    if reader.format().is_none() {
        return Err(DecodeError::UnknownFormat);
    }
    let image = reader.decode().map_err(|error| match error {
        ImageError::Unsupported(_) => DecodeError::UnknownFormat,
        other => DecodeError::Malformed(other.to_string()),
    })?;
    Bitmap::from_rgba(image.into_rgba8())
}

/// Identifies one load request. Only the most recent ticket handed out by a
/// surface is honored when its completion arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub(crate) fn after(previous: Option<LoadTicket>) -> Self {
        Self(previous.map_or(1, |ticket| ticket.0 + 1))
    }

    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Bytes waiting to be decoded. Owns its input so it can be moved to a worker
/// thread or held across an await.
pub struct LoadRequest {
    ticket: LoadTicket,
    bytes: Vec<u8>,
}

impl LoadRequest {
    pub fn new(ticket: LoadTicket, bytes: Vec<u8>) -> Self {
        Self { ticket, bytes }
    }

    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    pub fn decode(self) -> LoadCompletion {
        let result = decode(&self.bytes);
        match &result {
            Ok(bitmap) => {
                let size = bitmap.natural_size();
                debug!(
                    generation = self.ticket.0,
                    width = size.width,
                    height = size.height,
                    "image decoded"
                );
            }
            Err(error) => warn!(generation = self.ticket.0, %error, "image decode failed"),
        }
        LoadCompletion {
            ticket: self.ticket,
            result,
        }
    }
}

pub struct LoadCompletion {
    ticket: LoadTicket,
    result: DecodeResult<Bitmap>,
}

impl LoadCompletion {
    /// Builds a completion from a decode done outside [`LoadRequest::decode`].
    pub fn new(ticket: LoadTicket, result: DecodeResult<Bitmap>) -> Self {
        Self { ticket, result }
    }

    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    pub(crate) fn into_parts(self) -> (LoadTicket, DecodeResult<Bitmap>) {
        (self.ticket, self.result)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LoadOutcome {
    Loaded { natural: Size, display: Size, scale: f64 },
    /// A newer request (or a clear) arrived first; nothing changed.
    Superseded,
    /// The source was absent and the session was emptied.
    Cleared,
}
