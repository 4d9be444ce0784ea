use std::fmt;
use std::sync::OnceLock;

use crate::fringe_pipeline::common::error::{FringeError, Result};
use crate::fringe_pipeline::grid::PixelGrid;
use crate::fringe_pipeline::regions::types::{Region, RegionShape};

/// How partially covered pixels contribute to a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskMode {
    /// A pixel has weight 1 when its center lies inside the region, else 0.
    Center,
    /// Each pixel is sampled on an `n x n` grid; the weight is the covered fraction.
    Subpixels(u8),
}

impl MaskMode {
    fn samples_per_axis(self) -> usize {
        match self {
            MaskMode::Center => 1,
            MaskMode::Subpixels(n) => n.max(1) as usize,
        }
    }
}

impl Default for MaskMode {
    fn default() -> Self {
        MaskMode::Subpixels(5)
    }
}

/// Integer pixel bounds of a mask, half-open on the max side.
///
/// Non-finite extents saturate to the `i64` range so they never fit a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub ixmin: i64,
    pub ixmax: i64,
    pub iymin: i64,
    pub iymax: i64,
}

impl BoundingBox {
    fn from_extent((xmin, xmax, ymin, ymax): (f64, f64, f64, f64)) -> Self {
        let lower = |v: f64| if v.is_nan() { i64::MIN } else { (v + 0.5).floor() as i64 };
        let upper = |v: f64| if v.is_nan() { i64::MAX } else { (v + 0.5).ceil() as i64 };
        let ixmin = lower(xmin);
        let iymin = lower(ymin);
        Self {
            ixmin,
            ixmax: upper(xmax).max(ixmin),
            iymin,
            iymax: upper(ymax).max(iymin),
        }
    }

    pub fn width(&self) -> usize {
        span(self.ixmin, self.ixmax)
    }

    pub fn height(&self) -> usize {
        span(self.iymin, self.iymax)
    }

    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        let width = i64::try_from(width).unwrap_or(i64::MAX);
        let height = i64::try_from(height).unwrap_or(i64::MAX);
        self.ixmin >= 0 && self.iymin >= 0 && self.ixmax <= width && self.iymax <= height
    }
}

fn span(min: i64, max: i64) -> usize {
    usize::try_from(max.saturating_sub(min)).unwrap_or(usize::MAX)
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x[{}..{}) y[{}..{})",
            self.ixmin, self.ixmax, self.iymin, self.iymax
        )
    }
}

/// A region mapped onto the pixel lattice.
///
/// The bounding box is known up front; the coverage weights (row-major over
/// the box, in `[0, 1]`) are rasterised on the first cutout, once the box has
/// been checked against a grid, and reused afterwards.
#[derive(Debug, Clone)]
pub struct RegionMask {
    index: usize,
    bbox: BoundingBox,
    shape: RegionShape,
    mode: MaskMode,
    weights: OnceLock<Vec<f64>>,
}

impl RegionMask {
    /// Mask for `region`, which sits at position `index` in its region file.
    pub fn from_region(index: usize, region: &Region, mode: MaskMode) -> Self {
        Self {
            index,
            bbox: BoundingBox::from_extent(region.shape.extent()),
            shape: region.shape.clone(),
            mode,
            weights: OnceLock::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    pub fn mode(&self) -> MaskMode {
        self.mode
    }

    /// Fails with `OutOfBounds` unless the whole bounding box lies on the grid.
    pub fn check_bounds(&self, grid: &PixelGrid) -> Result<()> {
        if !self.bbox.fits_within(grid.width(), grid.height()) {
            return Err(FringeError::OutOfBounds {
                index: self.index,
                bbox: self.bbox,
                width: grid.width(),
                height: grid.height(),
            });
        }
        Ok(())
    }

    /// Cuts the bounding box out of `grid`.
    pub fn cutout<'a>(&'a self, grid: &'a PixelGrid) -> Result<Cutout<'a>> {
        self.check_bounds(grid)?;
        let weights = self.weights.get_or_init(|| self.rasterise());
        Ok(Cutout {
            bbox: self.bbox,
            weights,
            grid,
        })
    }

    // Only called once the box is known to lie on a grid.
    fn rasterise(&self) -> Vec<f64> {
        let samples = self.mode.samples_per_axis();
        let step = 1.0 / samples as f64;
        let total = (samples * samples) as f64;

        let mut weights = Vec::with_capacity(self.bbox.width() * self.bbox.height());
        for iy in self.bbox.iymin..self.bbox.iymax {
            for ix in self.bbox.ixmin..self.bbox.ixmax {
                let mut inside = 0usize;
                for sy in 0..samples {
                    let py = iy as f64 - 0.5 + (sy as f64 + 0.5) * step;
                    for sx in 0..samples {
                        let px = ix as f64 - 0.5 + (sx as f64 + 0.5) * step;
                        if self.shape.contains(px, py) {
                            inside += 1;
                        }
                    }
                }
                weights.push(inside as f64 / total);
            }
        }
        weights
    }
}

/// Pixel values of a grid under one mask's bounding box.
pub struct Cutout<'a> {
    bbox: BoundingBox,
    weights: &'a [f64],
    grid: &'a PixelGrid,
}

impl<'a> Cutout<'a> {
    /// Coverage weights, row-major over the bounding box.
    pub fn weights(&self) -> &'a [f64] {
        self.weights
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// `(value, weight)` pairs for pixels with nonzero coverage.
    pub fn weighted_values(&self) -> impl Iterator<Item = (f64, f64)> + 'a {
        let bbox = self.bbox;
        let grid = self.grid;
        let box_width = bbox.width();
        let weights = self.weights;
        weights
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > 0.0)
            .map(move |(i, &w)| {
                let x = bbox.ixmin as usize + i % box_width;
                let y = bbox.iymin as usize + i / box_width;
                (grid.get(x, y), w)
            })
    }

    /// Values of the pixels the region touches, unweighted.
    ///
    /// "Touches" is resolved at the mask's sampling resolution: a pixel is in
    /// the footprint when at least one of its sample points lies inside the
    /// region. With `Subpixels(n)` a sliver thinner than about `1/n` of a pixel
    /// can fall between samples and be left out; `Center` keeps only pixels
    /// whose center is inside.
    pub fn footprint_values(&self) -> Vec<f64> {
        self.weighted_values().map(|(v, _)| v).collect()
    }
}
