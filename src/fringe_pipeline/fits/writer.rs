use std::path::Path;

use crate::fringe_pipeline::common::error::Result;
use crate::fringe_pipeline::fits::header::FitsHeader;
use crate::fringe_pipeline::grid::PixelGrid;

pub trait GridWriter {
    /// Writes `grid` and `header` to `path`, replacing any existing file.
    fn write_grid(&self, path: &Path, grid: &PixelGrid, header: &FitsHeader) -> Result<()>;

    /// File extension (without the dot) of the files this writer produces.
    fn extension(&self) -> &str;
}
