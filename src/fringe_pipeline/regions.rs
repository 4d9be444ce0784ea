//! Region module
//!
//! Spatial regions read from a region-definition file, the pixel masks derived
//! from them, and the bright/dark pairing the fringe statistics rely on.

mod reader;
mod ds9_reader;
mod mask;
mod pairing;
pub mod types;

pub use reader::{RegionFormat, RegionReader};
pub use ds9_reader::Ds9RegionReader;
pub use mask::{BoundingBox, Cutout, MaskMode, RegionMask};
pub use pairing::{RegionPair, RegionSet};
pub use types::{Region, RegionShape};
