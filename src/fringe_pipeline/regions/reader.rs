use std::path::Path;
use std::str::FromStr;

use crate::fringe_pipeline::common::error::{FringeError, Result};
use crate::fringe_pipeline::regions::types::Region;

/// Region-definition file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionFormat {
    /// SAOImage DS9 region files in image/physical coordinates.
    #[default]
    Ds9,
}

impl FromStr for RegionFormat {
    type Err = FringeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ds9" => Ok(RegionFormat::Ds9),
            other => Err(FringeError::UnsupportedRegion(format!("region format '{other}'"))),
        }
    }
}

pub trait RegionReader {
    fn read_regions(&self, path: &Path, format: RegionFormat) -> Result<Vec<Region>>;
}
