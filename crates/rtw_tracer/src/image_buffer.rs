//! 8-bit RGB output buffer.

use bytemuck::{Pod, Zeroable};
use rtw_math::{Color, Interval};

/// Intensity range a gamma-corrected channel is clamped to before
/// quantization. Scaling by 256 then maps [0, 0.999] onto 0..=255.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// A packed 3-byte RGB pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);
    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Quantize a linear color: gamma-2 correct each channel, clamp to
    /// [0, 0.999] and scale by 256.
    pub fn from_linear(color: Color) -> Self {
        Self::new(
            quantize(linear_to_gamma(color.x)),
            quantize(linear_to_gamma(color.y)),
            quantize(linear_to_gamma(color.z)),
        )
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Apply gamma correction (gamma = 2.0).
///
/// Negative and NaN inputs map to zero.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

#[inline]
fn quantize(channel: f32) -> u8 {
    (256.0 * INTENSITY.clamp(channel)) as u8
}

/// Row-major grid of [`Rgb8`] pixels with fixed dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb8>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb8::BLACK; width * height],
        }
    }

    /// Create a buffer `width` pixels wide whose height follows from
    /// `aspect_ratio` (width / height), never less than one row.
    pub fn with_aspect_ratio(width: usize, aspect_ratio: f64) -> Self {
        Self::new(width, height_for(width, aspect_ratio))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Width over height.
    pub fn ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Get the pixel at (x, y), or `None` when out of range.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb8> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Get the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> Rgb8 {
        self.pixels[self.checked_index(x, y)]
    }

    /// Set the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the image.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb8) {
        let i = self.checked_index(x, y);
        self.pixels[i] = color;
    }

    pub fn pixels(&self) -> &[Rgb8] {
        &self.pixels
    }

    /// Raw packed RGB bytes, row-major, `3 * width * height` long.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.pixels.as_slice())
    }

    /// Split the buffer into disjoint mutable row bands.
    ///
    /// Each entry of `row_counts` is the number of rows in that band; the
    /// counts must add up to the image height.
    pub fn bands_mut(&mut self, row_counts: &[usize]) -> Vec<&mut [Rgb8]> {
        assert_eq!(
            row_counts.iter().sum::<usize>(),
            self.height,
            "row bands must cover the {} image rows exactly",
            self.height
        );

        let mut bands = Vec::with_capacity(row_counts.len());
        let mut rest = self.pixels.as_mut_slice();
        for &rows in row_counts {
            let (band, tail) = std::mem::take(&mut rest).split_at_mut(rows * self.width);
            bands.push(band);
            rest = tail;
        }
        bands
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    fn checked_index(&self, x: usize, y: usize) -> usize {
        match self.index(x, y) {
            Some(i) => i,
            None => panic!(
                "pixel ({x}, {y}) is out of range for a {}x{} image",
                self.width, self.height
            ),
        }
    }
}

/// Image height for a given width and aspect ratio (width / height).
pub fn height_for(width: usize, aspect_ratio: f64) -> usize {
    ((width as f64 / aspect_ratio) as usize).max(1)
}
