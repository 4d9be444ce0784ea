use tracing::{debug, instrument};

use crate::fringe_pipeline::common::error::{FringeError, Result};
use crate::fringe_pipeline::grid::PixelGrid;
use crate::fringe_pipeline::regions::{RegionMask, RegionSet};
use crate::fringe_pipeline::statistics::reduce::{mean, median, weighted_mean};

/// Mean of the coverage-weighted means of the dark (odd-indexed) regions.
///
/// Estimates the pedestal of `grid` under the mask pattern. Bright regions do
/// not contribute.
#[instrument(level = "debug", skip_all, fields(regions = regions.len()))]
pub fn weighted_regional_average(grid: &PixelGrid, regions: &RegionSet) -> Result<f64> {
    let region_means = regions
        .dark_masks()
        .map(|mask| {
            let cutout = mask.cutout(grid)?;
            weighted_mean(cutout.weighted_values())
                .ok_or(FringeError::EmptyMask { index: mask.index() })
        })
        .collect::<Result<Vec<f64>>>()?;

    let average = mean(&region_means).ok_or_else(|| {
        FringeError::EmptyRegionSet("no dark regions to average".to_string())
    })?;

    debug!(average, dark_regions = region_means.len(), "Weighted regional average");
    Ok(average)
}

/// Median over region pairs of `median(bright) - median(dark)`.
///
/// Pixel medians are unweighted over every pixel a region touches. A trailing
/// unpaired region is ignored.
#[instrument(level = "debug", skip_all, fields(pairs = regions.pair_count()))]
pub fn regional_median_contrast(grid: &PixelGrid, regions: &RegionSet) -> Result<f64> {
    let mut differences = regions
        .pairs()
        .map(|pair| {
            let bright = footprint_median(grid, pair.bright)?;
            let dark = footprint_median(grid, pair.dark)?;
            Ok(bright - dark)
        })
        .collect::<Result<Vec<f64>>>()?;

    let contrast = median(&mut differences).ok_or_else(|| {
        FringeError::EmptyRegionSet("no bright/dark pairs".to_string())
    })?;

    debug!(contrast, pairs = differences.len(), "Regional median contrast");
    Ok(contrast)
}

fn footprint_median(grid: &PixelGrid, mask: &RegionMask) -> Result<f64> {
    let mut values = mask.cutout(grid)?.footprint_values();
    median(&mut values).ok_or(FringeError::EmptyMask { index: mask.index() })
}
