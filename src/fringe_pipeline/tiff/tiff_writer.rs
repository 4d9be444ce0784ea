use std::io::Cursor;
use std::path::Path;

use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tiff::tags::Tag;
use tracing::debug;

use crate::fringe_pipeline::common::error::{FringeError, Result};
use crate::fringe_pipeline::common::output::write_atomically;
use crate::fringe_pipeline::fits::{FitsHeader, GridWriter, HeaderCard};
use crate::fringe_pipeline::grid::PixelGrid;
use crate::fringe_pipeline::tiff::types::TiffCompression;

/// Extension used for TIFF output files.
pub const TIFF_EXTENSION: &str = "tiff";

#[derive(Debug, Clone, Default)]
pub struct TiffGridWriter {
    pub compression: TiffCompression,
}

impl TiffGridWriter {
    pub fn new(compression: TiffCompression) -> Self {
        Self { compression }
    }

    /// Encodes the grid as `Gray32Float`.
    ///
    /// The header cards (provenance flag included) are stored one per line in
    /// the `ImageDescription` tag.
    pub fn encode(&self, grid: &PixelGrid, header: &FitsHeader) -> Result<Vec<u8>> {
        let compression = match self.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::Deflate => Compression::Deflate(DeflateLevel::Balanced),
        };

        let description = header
            .iter()
            .map(HeaderCard::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        let samples: Vec<f32> = grid.pixels().iter().map(|&p| p as f32).collect();

        let mut buffer = Vec::new();
        {
            let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
                .map_err(|e| FringeError::EncodeError(e.to_string()))?
                .with_compression(compression);

            let mut image = encoder
                .new_image::<Gray32Float>(grid.width() as u32, grid.height() as u32)
                .map_err(|e| FringeError::EncodeError(e.to_string()))?;
            if !description.is_empty() {
                image
                    .encoder()
                    .write_tag(Tag::ImageDescription, description.as_str())
                    .map_err(|e| FringeError::EncodeError(e.to_string()))?;
            }
            image
                .write_data(&samples)
                .map_err(|e| FringeError::EncodeError(e.to_string()))?;
        }

        Ok(buffer)
    }
}

impl GridWriter for TiffGridWriter {
    fn write_grid(&self, path: &Path, grid: &PixelGrid, header: &FitsHeader) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", grid.width(), grid.height());
        let bytes = self.encode(grid, header)?;
        write_atomically(path, &bytes)?;
        debug!("TIFF encoding complete");
        Ok(())
    }

    fn extension(&self) -> &str {
        TIFF_EXTENSION
    }
}
