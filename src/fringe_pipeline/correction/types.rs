//! Fringe correction configuration types

use crate::fringe_pipeline::fits::FitsBitpix;
use crate::fringe_pipeline::regions::{MaskMode, RegionFormat};
use crate::fringe_pipeline::tiff::TiffCompression;

/// Multiplier applied to raw fringe-frame values so they match the image's
/// intensity range (normalised calibration frame to 16-bit counts).
pub const DEFAULT_FRINGE_SCALE: f64 = 65535.0;

/// Appended to the image's file stem to name the corrected output.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_defrng";

/// Header keyword flagging an image as fringe corrected.
pub const PROVENANCE_KEYWORD: &str = "FRNGCORR";

/// Output file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// FITS primary HDU with the source header carried over
    #[default]
    Fits,
    /// 32-bit float grayscale TIFF, header cards in ImageDescription
    Tiff,
}

/// Configuration for fringe removal
#[derive(Debug, Clone)]
pub struct FringeConfig {
    /// Multiplier applied to the fringe frame as it is loaded
    pub fringe_scale: f64,
    /// Suffix appended to the image file stem for the output file
    pub output_suffix: String,
    /// Output file format
    pub output_format: OutputFormat,
    /// Sample format for FITS output
    pub fits_bitpix: FitsBitpix,
    /// Compression for TIFF output
    pub tiff_compression: TiffCompression,
    /// How region masks weight partially covered pixels
    pub mask_mode: MaskMode,
    /// Format of the region-definition file
    pub region_format: RegionFormat,
    /// Header keyword set to true on the corrected image
    pub provenance_key: String,
}

impl Default for FringeConfig {
    fn default() -> Self {
        Self {
            fringe_scale: DEFAULT_FRINGE_SCALE,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            output_format: OutputFormat::Fits,
            fits_bitpix: FitsBitpix::Float64,
            tiff_compression: TiffCompression::None,
            mask_mode: MaskMode::default(),
            region_format: RegionFormat::Ds9,
            provenance_key: PROVENANCE_KEYWORD.to_string(),
        }
    }
}

impl FringeConfig {
    pub fn builder() -> FringeConfigBuilder {
        FringeConfigBuilder::default()
    }
}

/// Builder for FringeConfig
#[derive(Default)]
pub struct FringeConfigBuilder {
    fringe_scale: Option<f64>,
    output_suffix: Option<String>,
    output_format: Option<OutputFormat>,
    fits_bitpix: Option<FitsBitpix>,
    tiff_compression: Option<TiffCompression>,
    mask_mode: Option<MaskMode>,
    region_format: Option<RegionFormat>,
    provenance_key: Option<String>,
}

impl FringeConfigBuilder {
    pub fn fringe_scale(mut self, scale: f64) -> Self {
        self.fringe_scale = Some(scale);
        self
    }

    pub fn output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = Some(suffix.into());
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn fits_bitpix(mut self, bitpix: FitsBitpix) -> Self {
        self.fits_bitpix = Some(bitpix);
        self
    }

    pub fn tiff_compression(mut self, compression: TiffCompression) -> Self {
        self.tiff_compression = Some(compression);
        self
    }

    pub fn mask_mode(mut self, mode: MaskMode) -> Self {
        self.mask_mode = Some(mode);
        self
    }

    pub fn region_format(mut self, format: RegionFormat) -> Self {
        self.region_format = Some(format);
        self
    }

    pub fn provenance_key(mut self, key: impl Into<String>) -> Self {
        self.provenance_key = Some(key.into());
        self
    }

    pub fn build(self) -> FringeConfig {
        let default = FringeConfig::default();
        FringeConfig {
            fringe_scale: self.fringe_scale.unwrap_or(default.fringe_scale),
            output_suffix: self.output_suffix.unwrap_or(default.output_suffix),
            output_format: self.output_format.unwrap_or(default.output_format),
            fits_bitpix: self.fits_bitpix.unwrap_or(default.fits_bitpix),
            tiff_compression: self.tiff_compression.unwrap_or(default.tiff_compression),
            mask_mode: self.mask_mode.unwrap_or(default.mask_mode),
            region_format: self.region_format.unwrap_or(default.region_format),
            provenance_key: self.provenance_key.unwrap_or(default.provenance_key),
        }
    }
}
