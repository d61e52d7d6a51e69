//! RGB888 pixel buffer produced by the page renderer and consumed by the
//! display driver.

use std::convert::Infallible;
use std::path::Path;

use embedded_graphics::{
    pixelcolor::{Rgb888, RgbColor},
    prelude::{DrawTarget, OriginDimensions, Pixel, Size},
};
use image::{
    error::{ParameterError, ParameterErrorKind},
    ImageError, RgbImage,
};

/// Panel width in pixels.
pub const WIDTH: usize = 240;
/// Panel height in pixels.
pub const HEIGHT: usize = 240;

const BYTES_PER_PIXEL: usize = 3;

/// Row-major grid of RGB triples.
///
/// The renderer always produces a `WIDTH`×`HEIGHT` buffer, but a buffer of any
/// size can be presented: pixels it does not cover are sent as black.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a full-panel buffer filled with black.
    pub fn new() -> Self {
        Self::with_size(WIDTH, HEIGHT)
    }

    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * BYTES_PER_PIXEL],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGB888 bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Colour at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb888> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * BYTES_PER_PIXEL;
        Some(Rgb888::new(
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
        ))
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb888) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) * BYTES_PER_PIXEL;
        self.data[idx] = color.r();
        self.data[idx + 1] = color.g();
        self.data[idx + 2] = color.b();
    }

    pub fn fill(&mut self, color: Rgb888) {
        for chunk in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk[0] = color.r();
            chunk[1] = color.g();
            chunk[2] = color.b();
        }
    }

    /// Write the buffer as an 8-bit RGB image; the format follows the extension.
    pub fn save_png(&self, path: &Path) -> Result<(), ImageError> {
        let (width, height) = (self.width as u32, self.height as u32);
        let image = RgbImage::from_raw(width, height, self.as_raw().to_vec()).ok_or_else(|| {
            ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            ))
        })?;
        image.save(path)
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl OriginDimensions for PixelBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for PixelBuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as usize, point.y as usize, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}
