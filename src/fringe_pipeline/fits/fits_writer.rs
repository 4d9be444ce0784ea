use std::path::Path;

use fitsio::FitsFile;
use fitsio::images::{ImageDescription, ImageType};
use tracing::debug;

use crate::fringe_pipeline::common::error::Result;
use crate::fringe_pipeline::common::output::write_atomically_with;
use crate::fringe_pipeline::fits::fits_error;
use crate::fringe_pipeline::fits::header::FitsHeader;
use crate::fringe_pipeline::fits::keywords;
use crate::fringe_pipeline::fits::writer::GridWriter;
use crate::fringe_pipeline::grid::PixelGrid;

/// Extension used for FITS output files.
pub const FITS_EXTENSION: &str = "fts";

/// Floating-point sample formats for written images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitsBitpix {
    Float32,
    #[default]
    Float64,
}

impl FitsBitpix {
    pub fn image_type(self) -> ImageType {
        match self {
            FitsBitpix::Float32 => ImageType::Float,
            FitsBitpix::Float64 => ImageType::Double,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FitsGridWriter {
    pub bitpix: FitsBitpix,
}

impl FitsGridWriter {
    pub fn new(bitpix: FitsBitpix) -> Self {
        Self { bitpix }
    }

    /// Creates a single primary HDU at `path`, which must not exist yet.
    ///
    /// cfitsio generates the structural keywords from the grid; every other
    /// card of `header` is appended in order.
    fn create(&self, path: &Path, grid: &PixelGrid, header: &FitsHeader) -> Result<()> {
        let description = ImageDescription {
            data_type: self.bitpix.image_type(),
            dimensions: &[grid.height(), grid.width()],
        };
        let mut fptr = FitsFile::create(path)
            .with_custom_primary(&description)
            .open()
            .map_err(fits_error(path))?;
        let hdu = fptr.primary_hdu().map_err(fits_error(path))?;

        let written = match self.bitpix {
            FitsBitpix::Float32 => {
                let samples: Vec<f32> = grid.pixels().iter().map(|&p| p as f32).collect();
                hdu.write_image(&mut fptr, &samples)
            }
            FitsBitpix::Float64 => hdu.write_image(&mut fptr, grid.pixels()),
        };
        written.map_err(fits_error(path))?;

        keywords::write_header(&mut fptr, path, header)
    }
}

impl GridWriter for FitsGridWriter {
    fn write_grid(&self, path: &Path, grid: &PixelGrid, header: &FitsHeader) -> Result<()> {
        debug!("Encoding FITS image: {}x{}", grid.width(), grid.height());
        write_atomically_with(path, |staged| self.create(staged, grid, header))
    }

    fn extension(&self) -> &str {
        FITS_EXTENSION
    }
}
