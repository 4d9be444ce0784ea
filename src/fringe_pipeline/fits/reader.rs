use std::path::Path;

use crate::fringe_pipeline::common::error::Result;
use crate::fringe_pipeline::fits::header::FitsHeader;
use crate::fringe_pipeline::grid::PixelGrid;

pub trait GridReader {
    fn read_grid(&self, path: &Path) -> Result<(PixelGrid, FitsHeader)>;
    fn read_header(&self, path: &Path) -> Result<FitsHeader>;
}
