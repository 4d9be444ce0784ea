use std::path::PathBuf;

use thiserror::Error;

use crate::fringe_pipeline::regions::BoundingBox;

#[derive(Error, Debug)]
pub enum FringeError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Grid shape mismatch: expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}")]
    ShapeMismatch {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error("Region {index} footprint {bbox} lies outside the {width}x{height} grid")]
    OutOfBounds {
        index: usize,
        bbox: BoundingBox,
        width: usize,
        height: usize,
    },

    #[error("Fringe contrast is zero, scale factor is undefined")]
    DivisionByZero,

    #[error("Fringe scale factor is not finite: {0}")]
    NonFiniteScale(f64),

    #[error("Region set is unusable: {0}")]
    EmptyRegionSet(String),

    #[error("Region {index} does not cover any pixel")]
    EmptyMask { index: usize },

    #[error("Invalid grid dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Failed to parse region file at line {line}: {message}")]
    RegionParse { line: usize, message: String },

    #[error("Unsupported region definition: {0}")]
    UnsupportedRegion(String),

    #[error("Invalid FITS data: {0}")]
    InvalidFits(String),

    #[error("FITS error in '{}': {source}", path.display())]
    Fits {
        path: PathBuf,
        source: fitsio::errors::Error,
    },

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FringeError>;
