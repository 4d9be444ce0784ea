//! Fringe removal pipeline module
//!
//! This module removes a periodic fringe pattern from an astronomical image by
//! scaling and subtracting a calibration frame. It is organised like the other
//! image pipelines: region statistics and grid arithmetic in the middle, FITS/TIFF
//! and DS9 collaborators at the edges, and a generic pipeline tying them together.

pub mod common;
pub mod grid;
pub mod regions;
pub mod statistics;
pub mod fits;
pub mod tiff;
pub mod correction;

pub use common::{
    FringeError,
    Result,
};

pub use grid::PixelGrid;

pub use regions::{
    BoundingBox,
    Ds9RegionReader,
    MaskMode,
    Region,
    RegionFormat,
    RegionMask,
    RegionPair,
    RegionReader,
    RegionSet,
    RegionShape,
};

pub use statistics::{
    regional_median_contrast,
    weighted_regional_average,
};

pub use fits::{
    FitsBitpix,
    FitsGridReader,
    FitsGridWriter,
    FitsHeader,
    GridReader,
    GridWriter,
    HeaderCard,
    HeaderValue,
};

pub use tiff::{
    TiffCompression,
    TiffGridWriter,
};

pub use correction::{
    remove_fringe,
    FringeConfig,
    FringeConfigBuilder,
    FringeCorrection,
    FringeRemovalPipeline,
    FringeReport,
    OutputFormat,
    OutputWriter,
    PipelineTimings,
    StepTiming,
    Timer,
    DEFAULT_FRINGE_SCALE,
    DEFAULT_OUTPUT_SUFFIX,
    PROVENANCE_KEYWORD,
};
