//! FITS module
//!
//! Header model plus the grid reader/writer traits and their FITS
//! implementations (primary HDU through `fitsio`).

use std::path::{Path, PathBuf};

use crate::fringe_pipeline::common::error::FringeError;

mod header;
mod keywords;
mod reader;
mod writer;
mod fits_reader;
mod fits_writer;

pub use header::{FitsHeader, HeaderCard, HeaderValue};
pub use reader::GridReader;
pub use writer::GridWriter;
pub use fits_reader::FitsGridReader;
pub use fits_writer::{FitsBitpix, FitsGridWriter};

fn fits_error(path: &Path) -> impl Fn(fitsio::errors::Error) -> FringeError + '_ {
    move |source| FringeError::Fits {
        path: PathBuf::from(path),
        source,
    }
}
