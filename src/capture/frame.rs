//! Frame type representing a captured screen region with metadata.

use std::time::Instant;

/// Bytes per pixel in a frame buffer (packed RGB, no alpha).
pub const BYTES_PER_PIXEL: usize = 3;

/// A single captured frame of the game window.
///
/// Contains packed RGB pixel data along with metadata needed for
/// sequencing, trace records and debugging. The channel order is
/// fixed (R, G, B) regardless of what the capture backend produced.
#[derive(Clone)]
pub struct Frame {
    /// Packed RGB pixel data, row-major, 3 bytes per pixel.
    pixels: Vec<u8>,
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// When the frame was captured.
    timestamp: Instant,
    /// Capture counter assigned by the source.
    sequence: u64,
}

impl Frame {
    /// Creates a new frame from packed RGB bytes.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            timestamp: Instant::now(),
            sequence,
        }
    }

    /// Creates a uniformly colored frame.
    ///
    /// Used by the scripted capture source and by tests; real frames
    /// always come from a capture backend.
    pub fn filled(width: u32, height: u32, rgb: (u8, u8, u8), sequence: u64) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * BYTES_PER_PIXEL);
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&[rgb.0, rgb.1, rgb.2]);
        }
        Self::new(pixels, width, height, sequence)
    }

    /// Converts a backend RGBA image into a frame, dropping the alpha channel.
    pub fn from_rgba(image: &image::RgbaImage, sequence: u64) -> Self {
        let (width, height) = image.dimensions();
        let mut pixels = Vec::with_capacity(width as usize * height as usize * BYTES_PER_PIXEL);
        for px in image.pixels() {
            pixels.extend_from_slice(&[px.0[0], px.0[1], px.0[2]]);
        }
        Self::new(pixels, width, height, sequence)
    }

    /// Returns a reference to the packed RGB data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns when the frame was captured.
    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Returns the capture sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the pixel count, width times height.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Returns the RGB triple at `(x, y)`, or `None` when out of bounds
    /// or when the buffer does not match the declared dimensions.
    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height || !self.is_valid() {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        Some((
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        ))
    }

    /// Mutates the RGB triple at `(x, y)`; out-of-bounds writes are ignored.
    ///
    /// Only used to paint synthetic frames for scripted sessions and tests.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: (u8, u8, u8)) {
        if x >= self.width || y >= self.height || !self.is_valid() {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        self.pixels[offset] = rgb.0;
        self.pixels[offset + 1] = rgb.1;
        self.pixels[offset + 2] = rgb.2;
    }

    /// Checks that the buffer length agrees with the declared dimensions.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == self.pixel_count() * BYTES_PER_PIXEL
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}
