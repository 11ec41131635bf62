use crate::core::data::colour::Colour;
use std::error::Error;
use std::fmt;

const BYTES_PER_PIXEL: usize = 4;

fn dimensions_to_byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * BYTES_PER_PIXEL
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RgbaBufferError {
    BoundsMismatch {
        expected_bytes: usize,
        actual_bytes: usize,
    },
    PixelOutsideBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

impl fmt::Display for RgbaBufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoundsMismatch {
                expected_bytes,
                actual_bytes,
            } => {
                write!(
                    f,
                    "buffer of {} bytes does not match expected size {}",
                    actual_bytes, expected_bytes
                )
            }
            Self::PixelOutsideBounds {
                x,
                y,
                width,
                height,
            } => {
                write!(
                    f,
                    "pixel at x:{}, y:{} outside of {}x{} buffer",
                    x, y, width, height
                )
            }
        }
    }
}

impl Error for RgbaBufferError {}

/// Caller-owned RGBA8 raster.
///
/// Sized once and resized in place between frames so render stages can reuse
/// allocations. Alpha is fully opaque everywhere the engine writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbaBuffer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut buffer = Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        };
        buffer.resize(width, height);
        buffer
    }

    pub fn from_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RgbaBufferError> {
        let expected_bytes = dimensions_to_byte_len(width, height);

        if expected_bytes != data.len() {
            return Err(RgbaBufferError::BoundsMismatch {
                expected_bytes,
                actual_bytes: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Resizes in place, reusing the existing allocation where possible.
    /// Contents after a resize are opaque black.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data.resize(dimensions_to_byte_len(width, height), 0);
        self.fill(Colour::BLACK);
    }

    pub fn fill(&mut self, colour: Colour) {
        for pixel in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel[0] = colour.r;
            pixel[1] = colour.g;
            pixel[2] = colour.b;
            pixel[3] = 255;
        }
    }

    pub fn set_index(&mut self, index: usize, colour: Colour) {
        let offset = index * BYTES_PER_PIXEL;
        self.data[offset] = colour.r;
        self.data[offset + 1] = colour.g;
        self.data[offset + 2] = colour.b;
        self.data[offset + 3] = 255;
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, colour: Colour) -> Result<(), RgbaBufferError> {
        if x >= self.width || y >= self.height {
            return Err(RgbaBufferError::PixelOutsideBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        self.set_index((y * self.width + x) as usize, colour);
        Ok(())
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let offset = (y * self.width + x) as usize * BYTES_PER_PIXEL;
        Some([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ])
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_opaque_black_buffer() {
        let buffer = RgbaBuffer::new(3, 2);

        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 2);
        assert_eq!(buffer.as_bytes().len(), 24);
        assert_eq!(buffer.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(buffer.pixel(2, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_from_data_validates_byte_length() {
        let result = RgbaBuffer::from_data(2, 2, vec![0; 12]);

        assert_eq!(
            result.unwrap_err(),
            RgbaBufferError::BoundsMismatch {
                expected_bytes: 16,
                actual_bytes: 12
            }
        );
    }

    #[test]
    fn test_from_data_accepts_exact_length() {
        let data: Vec<u8> = (0..16).collect();
        let buffer = RgbaBuffer::from_data(2, 2, data.clone()).unwrap();

        assert_eq!(buffer.as_bytes(), data.as_slice());
    }

    #[test]
    fn test_resize_resets_to_black() {
        let mut buffer = RgbaBuffer::new(1, 1);
        buffer.fill(Colour::RED);
        buffer.resize(2, 2);

        assert_eq!(buffer.pixel_count(), 4);
        assert!(
            buffer
                .as_bytes()
                .chunks_exact(4)
                .all(|px| px == [0, 0, 0, 255])
        );
    }

    #[test]
    fn test_fill_red() {
        let mut buffer = RgbaBuffer::new(2, 1);
        buffer.fill(Colour::RED);

        assert_eq!(buffer.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(buffer.pixel(1, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_set_pixel_round_trip() {
        let mut buffer = RgbaBuffer::new(3, 3);
        let teal = Colour {
            r: 0,
            g: 128,
            b: 128,
        };

        buffer.set_pixel(2, 1, teal).unwrap();

        assert_eq!(buffer.pixel(2, 1), Some([0, 128, 128, 255]));
    }

    #[test]
    fn test_set_pixel_outside_bounds() {
        let mut buffer = RgbaBuffer::new(2, 2);
        let result = buffer.set_pixel(2, 0, Colour::BLACK);

        assert_eq!(
            result,
            Err(RgbaBufferError::PixelOutsideBounds {
                x: 2,
                y: 0,
                width: 2,
                height: 2
            })
        );
    }
}
