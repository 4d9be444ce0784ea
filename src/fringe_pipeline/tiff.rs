//! TIFF export module
//!
//! Writes corrected grids as single-channel 32-bit float TIFF files, as an
//! alternative to FITS output for tools that cannot read FITS.

mod tiff_writer;
pub mod types;

pub use tiff_writer::TiffGridWriter;
pub use types::TiffCompression;
