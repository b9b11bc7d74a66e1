//! Captured image frames.
//!
//! A [`Frame`] is a raw RGB8 pixel buffer. Frames arrive either as
//! encoded image bytes (JPEG/PNG from the capture client) or as raw
//! buffers with a known color layout; both are normalized to RGB here
//! so the rest of the pipeline never sees BGR data.

use crate::error::{EngineError, EngineResult};

/// Byte order of a raw pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLayout {
    /// Red, green, blue triplets.
    Rgb,
    /// Blue, green, red triplets (the usual camera-capture order).
    Bgr,
}

/// A decoded image frame in RGB8 layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Builds a frame from a raw pixel buffer, normalizing BGR to RGB.
    ///
    /// Returns an error if the buffer length does not match
    /// `width * height * 3`.
    pub fn from_raw(
        width: u32,
        height: u32,
        layout: ColorLayout,
        mut data: Vec<u8>,
    ) -> EngineResult<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(EngineError::UnreadableFrame {
                message: format!(
                    "expected {} bytes for a {}x{} RGB frame, got {}",
                    expected,
                    width,
                    height,
                    data.len()
                ),
            });
        }
        if layout == ColorLayout::Bgr {
            for pixel in data.chunks_exact_mut(3) {
                pixel.swap(0, 2);
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Decodes encoded image bytes (JPEG or PNG) into an RGB frame.
    pub fn decode(bytes: &[u8]) -> EngineResult<Self> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| EngineError::UnreadableFrame {
                message: e.to_string(),
            })?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Self {
            width,
            height,
            data: rgb.into_raw(),
        })
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The RGB8 pixel buffer, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
