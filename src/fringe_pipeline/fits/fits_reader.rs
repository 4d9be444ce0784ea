//! FITS image reader.
//!
//! Decodes the primary HDU of a FITS file into a [`PixelGrid`] through
//! `fitsio`. cfitsio applies `BSCALE`/`BZERO` while converting the samples, so
//! the grid holds physical values whatever the stored BITPIX.

use std::path::Path;

use fitsio::FitsFile;
use fitsio::hdu::HduInfo;
use fitsio::images::ImageType;
use tracing::debug;

use crate::fringe_pipeline::common::error::{FringeError, Result};
use crate::fringe_pipeline::fits::fits_error;
use crate::fringe_pipeline::fits::header::FitsHeader;
use crate::fringe_pipeline::fits::keywords;
use crate::fringe_pipeline::fits::reader::GridReader;
use crate::fringe_pipeline::grid::PixelGrid;

pub struct FitsGridReader;

/// Width, height and stored sample size of a primary image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ImageLayout {
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
}

impl ImageLayout {
    /// cfitsio reports the shape slowest axis first: `[NAXIS2, NAXIS1]`.
    fn from_info(info: &HduInfo) -> Result<Self> {
        let HduInfo::ImageInfo { shape, image_type } = info else {
            return Err(FringeError::InvalidFits(
                "primary HDU is not an image".to_string(),
            ));
        };
        let (width, height) = match shape[..] {
            [height, width] | [1, height, width] if width > 0 && height > 0 => (width, height),
            _ => {
                return Err(FringeError::InvalidFits(format!(
                    "expected a 2D image, got axes {shape:?}"
                )));
            }
        };
        Ok(Self {
            width,
            height,
            bytes_per_pixel: bytes_per_pixel(image_type),
        })
    }

    /// Stored data size, `None` when it does not fit in `usize`.
    fn data_len(&self) -> Option<usize> {
        self.width
            .checked_mul(self.height)?
            .checked_mul(self.bytes_per_pixel)
    }

    /// Rejects headers announcing more data than the file holds, before any
    /// buffer is sized from them.
    fn check_file_len(&self, file_len: u64) -> Result<()> {
        match self.data_len() {
            Some(len) if u64::try_from(len).is_ok_and(|len| len <= file_len) => Ok(()),
            Some(len) => Err(FringeError::InvalidFits(format!(
                "{}x{} image needs {len} bytes, file has {file_len}",
                self.width, self.height
            ))),
            None => Err(FringeError::InvalidFits(format!(
                "{}x{} image size overflows",
                self.width, self.height
            ))),
        }
    }
}

fn bytes_per_pixel(image_type: &ImageType) -> usize {
    match image_type {
        ImageType::UnsignedByte | ImageType::Byte => 1,
        ImageType::Short | ImageType::UnsignedShort => 2,
        ImageType::Long | ImageType::UnsignedLong | ImageType::Float => 4,
        ImageType::LongLong | ImageType::Double => 8,
    }
}

impl GridReader for FitsGridReader {
    fn read_grid(&self, path: &Path) -> Result<(PixelGrid, FitsHeader)> {
        let mut fptr = FitsFile::open(path).map_err(fits_error(path))?;
        let hdu = fptr.primary_hdu().map_err(fits_error(path))?;

        let layout = ImageLayout::from_info(&hdu.info)?;
        layout.check_file_len(std::fs::metadata(path)?.len())?;
        debug!(
            "Decoding FITS image {}: {}x{}",
            path.display(),
            layout.width,
            layout.height
        );

        let pixels: Vec<f64> = hdu.read_image(&mut fptr).map_err(fits_error(path))?;
        let header = keywords::read_header(&mut fptr, path)?;

        let grid = PixelGrid::new(layout.width, layout.height, pixels)?;
        Ok((grid, header))
    }

    fn read_header(&self, path: &Path) -> Result<FitsHeader> {
        let mut fptr = FitsFile::open(path).map_err(fits_error(path))?;
        fptr.primary_hdu().map_err(fits_error(path))?;
        keywords::read_header(&mut fptr, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitsio::images::ImageDescription;

    use crate::fringe_pipeline::fits::header::HeaderValue;

    fn write_image<T: fitsio::images::WriteImage>(
        path: &Path,
        image_type: ImageType,
        dimensions: &[usize],
        data: &[T],
    ) -> FitsFile {
        let description = ImageDescription {
            data_type: image_type,
            dimensions,
        };
        let mut fptr = FitsFile::create(path)
            .with_custom_primary(&description)
            .open()
            .unwrap();
        let hdu = fptr.primary_hdu().unwrap();
        hdu.write_image(&mut fptr, data).unwrap();
        fptr
    }

    /// A hand-assembled primary header with no data blocks behind it.
    fn header_only_file(path: &Path, cards: &[&str]) {
        let mut bytes: Vec<u8> = cards
            .iter()
            .chain(std::iter::once(&"END"))
            .flat_map(|card| format!("{card:<80}").into_bytes())
            .collect();
        bytes.resize(2880, b' ');
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_read_unsigned_16_bit_applies_bzero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.fts");
        drop(write_image(
            &path,
            ImageType::UnsignedShort,
            &[2, 2],
            &[0u16, 100, 40000, 65535],
        ));

        let (grid, header) = FitsGridReader.read_grid(&path).unwrap();
        assert_eq!(grid.dimensions(), (2, 2));
        assert_eq!(grid.pixels(), &[0.0, 100.0, 40000.0, 65535.0]);
        assert_eq!(header.get_int("BZERO"), Some(32768));
    }

    #[test]
    fn test_read_float_row_major() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("float.fts");
        drop(write_image(
            &path,
            ImageType::Float,
            &[2, 3],
            &[0.0f32, 0.25, 0.5, 1.0, 2.0, 3.0],
        ));

        let (grid, header) = FitsGridReader.read_grid(&path).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.get(2, 0), 0.5);
        assert_eq!(grid.get(0, 1), 1.0);
        assert_eq!(header.get_int("BITPIX"), Some(-32));
    }

    #[test]
    fn test_read_degenerate_third_axis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plane.fts");
        drop(write_image(&path, ImageType::UnsignedByte, &[1, 1, 2], &[7u8, 9]));

        let (grid, _) = FitsGridReader.read_grid(&path).unwrap();
        assert_eq!(grid.pixels(), &[7.0, 9.0]);
    }

    #[test]
    fn test_read_rejects_cube() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.fts");
        drop(write_image(&path, ImageType::UnsignedByte, &[3, 2, 2], &[0u8; 12]));

        let err = FitsGridReader.read_grid(&path).unwrap_err();
        assert!(matches!(err, FringeError::InvalidFits(_)));
    }

    #[test]
    fn test_read_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.fts");
        let mut fptr = write_image(&path, ImageType::UnsignedByte, &[2, 2], &[1u8, 2, 3, 4]);
        let hdu = fptr.primary_hdu().unwrap();
        hdu.write_key(&mut fptr, "OBJECT", "M51").unwrap();
        drop(fptr);

        let header = FitsGridReader.read_header(&path).unwrap();
        assert_eq!(header.get_text("OBJECT"), Some("M51"));
        assert_eq!(header.get_int("NAXIS1"), Some(2));
        assert_eq!(header.cards()[0].value, HeaderValue::Logical(true));
    }

    #[test]
    fn test_oversized_header_is_rejected_without_allocating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.fts");
        header_only_file(
            &path,
            &[
                "SIMPLE  =                    T",
                "BITPIX  =                  -64",
                "NAXIS   =                    2",
                "NAXIS1  =  2305843009213693952",
                "NAXIS2  =                    4",
            ],
        );

        let err = FitsGridReader.read_grid(&path).unwrap_err();
        assert!(matches!(
            err,
            FringeError::InvalidFits(_) | FringeError::Fits { .. }
        ));
    }

    #[test]
    fn test_layout_size_checks() {
        let layout = ImageLayout {
            width: 1 << 61,
            height: 4,
            bytes_per_pixel: 8,
        };
        assert_eq!(layout.data_len(), None);
        assert!(matches!(
            layout.check_file_len(u64::MAX),
            Err(FringeError::InvalidFits(_))
        ));

        let layout = ImageLayout {
            width: 100,
            height: 100,
            bytes_per_pixel: 8,
        };
        assert!(layout.check_file_len(80_000 + 2880).is_ok());
        assert!(matches!(
            layout.check_file_len(2880),
            Err(FringeError::InvalidFits(_))
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.fts");
        let err = FitsGridReader.read_grid(&path).unwrap_err();
        assert!(matches!(err, FringeError::Fits { path: ref p, .. } if *p == path));
    }
}
