use crate::draw::color::Color;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("pixel data has {actual} bytes, expected {expected} for {width}x{height}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("failed to encode png: {0}")]
    Encode(String),
}

/// Byte offset of pixel `(x, y)` in a `width`-wide RGBA buffer.
pub fn pixel_index(x: u32, y: u32, width: u32) -> usize {
    (y as usize * width as usize + x as usize) * 4
}

pub fn byte_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

/// Reads the color at `(x, y)`; the caller guarantees the coordinate is in range.
pub fn read_pixel(pixels: &[u8], x: u32, y: u32, width: u32) -> Color {
    let idx = pixel_index(x, y, width);
    Color {
        r: pixels[idx],
        g: pixels[idx + 1],
        b: pixels[idx + 2],
        a: pixels[idx + 3],
    }
}

pub fn write_pixel(pixels: &mut [u8], x: u32, y: u32, width: u32, color: Color) {
    let idx = pixel_index(x, y, width);
    pixels[idx] = color.r;
    pixels[idx + 1] = color.g;
    pixels[idx + 2] = color.b;
    pixels[idx + 3] = color.a;
}

/// A `width × height` grid of RGBA pixels, 4 bytes per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let mut pixels = vec![0u8; byte_len(width, height)];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&fill.to_rgba_array());
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BufferError> {
        let expected = byte_len(width, height);
        if pixels.len() != expected {
            return Err(BufferError::LengthMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.contains(x, y) {
            return None;
        }
        Some(read_pixel(&self.pixels, x as u32, y as u32, self.width))
    }

    /// Writes one pixel. Returns false when `(x, y)` is outside the buffer.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        write_pixel(&mut self.pixels, x as u32, y as u32, self.width, color);
        true
    }

    pub fn fill(&mut self, color: Color) {
        let rgba = color.to_rgba_array();
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    /// Copies `other` into this buffer, reallocating only when the sizes differ.
    pub fn copy_from(&mut self, other: &PixelBuffer) {
        if self.width == other.width && self.height == other.height {
            self.pixels.copy_from_slice(&other.pixels);
        } else {
            *self = other.clone();
        }
    }

    /// New buffer of the requested size with the current content anchored at the
    /// top-left corner. Uncovered area is painted with `background`.
    pub fn resized(&self, width: u32, height: u32, background: Color) -> PixelBuffer {
        let mut out = PixelBuffer::new(width, height, background);
        let copy_w = self.width.min(width) as usize;
        let copy_h = self.height.min(height);
        for y in 0..copy_h {
            let src = pixel_index(0, y, self.width);
            let dst = pixel_index(0, y, width);
            out.pixels[dst..dst + copy_w * 4].copy_from_slice(&self.pixels[src..src + copy_w * 4]);
        }
        out
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, BufferError> {
        let mut out = Vec::with_capacity(self.pixels.len() / 4);
        PngEncoder::new(&mut out)
            .write_image(&self.pixels, self.width, self.height, ColorType::Rgba8)
            .map_err(|err| BufferError::Encode(err.to_string()))?;
        Ok(out)
    }
}
