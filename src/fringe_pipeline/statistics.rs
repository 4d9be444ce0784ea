//! Region statistics module
//!
//! Reductions over masked cutouts: the coverage-weighted baseline of the dark
//! regions and the median bright/dark contrast of the region pairs.

mod reduce;
mod regional;

pub use reduce::{mean, median, weighted_mean};
pub use regional::{regional_median_contrast, weighted_regional_average};
