use tracing::{debug, info_span, instrument};

use crate::fringe_pipeline::common::error::{FringeError, Result};
use crate::fringe_pipeline::grid::PixelGrid;
use crate::fringe_pipeline::regions::RegionSet;
use crate::fringe_pipeline::statistics::{regional_median_contrast, weighted_regional_average};

/// Result of a fringe correction together with the intermediate statistics.
#[derive(Debug, Clone)]
pub struct FringeCorrection {
    pub corrected: PixelGrid,
    /// Pedestal removed from the fringe frame before scaling.
    pub baseline: f64,
    pub fringe_contrast: f64,
    pub image_contrast: f64,
    /// Factor applied to the baseline-removed fringe frame.
    pub scale: f64,
}

/// Removes the fringe pattern in `fringe` from `image`.
///
/// The fringe frame is consumed as the working copy: its regional baseline is
/// subtracted, it is scaled so its bright/dark contrast matches the image's,
/// and the result is subtracted from the image. Shapes and region bounds are
/// checked before any statistics are computed.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn remove_fringe(
    image: &PixelGrid,
    mut fringe: PixelGrid,
    regions: &RegionSet,
) -> Result<FringeCorrection> {
    image.ensure_same_shape(&fringe)?;
    regions.check_bounds(image)?;

    let baseline = weighted_regional_average(&fringe, regions)?;
    fringe.add_scalar(-baseline);

    let fringe_contrast = regional_median_contrast(&fringe, regions)?;
    let image_contrast = regional_median_contrast(image, regions)?;
    let scale = scale_factor(image_contrast, fringe_contrast)?;
    debug!(baseline, fringe_contrast, image_contrast, scale, "Fringe statistics");

    let _span = info_span!("subtract_fringe").entered();
    fringe.scale(scale);
    let corrected = image.subtract(&fringe)?;

    Ok(FringeCorrection {
        corrected,
        baseline,
        fringe_contrast,
        image_contrast,
        scale,
    })
}

fn scale_factor(image_contrast: f64, fringe_contrast: f64) -> Result<f64> {
    if fringe_contrast == 0.0 {
        return Err(FringeError::DivisionByZero);
    }
    let scale = image_contrast / fringe_contrast;
    if !scale.is_finite() {
        return Err(FringeError::NonFiniteScale(scale));
    }
    Ok(scale)
}
