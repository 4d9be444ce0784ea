//! Pixel grid types

use crate::fringe_pipeline::common::error::{FringeError, Result};

/// A single-channel image held fully in memory.
///
/// Pixels are stored row-major: `data[y * width + x]`, with row 0 being the
/// first row stored in the source file (FITS `NAXIS2 = 1`).
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl PixelGrid {
    /// Wraps existing pixel data, checking that it matches the dimensions.
    pub fn new(width: usize, height: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != Self::pixel_count(width, height)? {
            return Err(FringeError::InvalidDimensions(width, height));
        }
        Ok(Self { width, height, data })
    }

    /// `width * height`, failing on zero-sized or overflowing dimensions.
    pub fn pixel_count(width: usize, height: usize) -> Result<usize> {
        width
            .checked_mul(height)
            .filter(|&count| count > 0)
            .ok_or(FringeError::InvalidDimensions(width, height))
    }

    /// Creates a grid with every pixel set to `value`.
    pub fn filled(width: usize, height: usize, value: f64) -> Result<Self> {
        let count = Self::pixel_count(width, height)?;
        Self::new(width, height, vec![value; count])
    }

    /// Creates a grid by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> f64) -> Result<Self> {
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self::new(width, height, data)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x] = value;
    }

    #[inline]
    pub fn pixels(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn into_pixels(self) -> Vec<f64> {
        self.data
    }

    pub fn add_scalar(&mut self, value: f64) {
        self.data.iter_mut().for_each(|p| *p += value);
    }

    pub fn scale(&mut self, factor: f64) {
        self.data.iter_mut().for_each(|p| *p *= factor);
    }

    /// Fails with `ShapeMismatch` unless `other` has the same dimensions as `self`.
    pub fn ensure_same_shape(&self, other: &PixelGrid) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(FringeError::ShapeMismatch {
                expected_width: self.width,
                expected_height: self.height,
                actual_width: other.width,
                actual_height: other.height,
            });
        }
        Ok(())
    }

    /// Elementwise `self - other`.
    pub fn subtract(&self, other: &PixelGrid) -> Result<PixelGrid> {
        self.ensure_same_shape(other)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a - b)
            .collect();
        Ok(PixelGrid {
            width: self.width,
            height: self.height,
            data,
        })
    }
}
