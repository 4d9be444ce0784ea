use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use defringe_rs::fringe_pipeline::{
    FitsBitpix, FringeConfig, FringeRemovalPipeline, MaskMode, OutputFormat, TiffCompression,
    DEFAULT_FRINGE_SCALE, DEFAULT_OUTPUT_SUFFIX,
};
use defringe_rs::logger;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "defringe")]
#[command(version, about = "Remove fringe patterns from astronomical images", long_about = None)]
struct Cli {
    /// Science image (FITS)
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Fringe calibration frame (FITS, normalised)
    #[arg(value_name = "FRINGE")]
    fringe: PathBuf,

    /// DS9 region file with alternating bright/dark regions
    #[arg(value_name = "REGIONS")]
    regions: PathBuf,

    /// Multiplier applied to the fringe frame on load
    #[arg(long, value_name = "FLOAT", default_value_t = DEFAULT_FRINGE_SCALE)]
    fringe_scale: f64,

    /// Suffix appended to the image name for the output file
    #[arg(long, value_name = "SUFFIX", default_value = DEFAULT_OUTPUT_SUFFIX)]
    suffix: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Fits)]
    format: FormatArg,

    /// TIFF compression (only with --format tiff)
    #[arg(long, value_enum, default_value_t = CompressionArg::None)]
    compression: CompressionArg,

    /// Write 32-bit float FITS data instead of 64-bit
    #[arg(long)]
    single_precision: bool,

    /// How partially covered pixels are weighted
    #[arg(long, value_enum, default_value_t = MaskArg::Subpixel)]
    mask_mode: MaskArg,

    /// Subsamples per pixel axis for the subpixel mask mode
    #[arg(long, value_name = "N", default_value_t = 5)]
    subpixels: u8,

    /// Log per-step timings
    #[arg(long)]
    timings: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Fits,
    Tiff,
}

#[derive(Clone, Copy, ValueEnum)]
enum CompressionArg {
    None,
    Lzw,
    Deflate,
}

#[derive(Clone, Copy, ValueEnum)]
enum MaskArg {
    Center,
    Subpixel,
}

impl Cli {
    fn config(&self) -> FringeConfig {
        let output_format = match self.format {
            FormatArg::Fits => OutputFormat::Fits,
            FormatArg::Tiff => OutputFormat::Tiff,
        };
        let tiff_compression = match self.compression {
            CompressionArg::None => TiffCompression::None,
            CompressionArg::Lzw => TiffCompression::Lzw,
            CompressionArg::Deflate => TiffCompression::Deflate,
        };
        let mask_mode = match self.mask_mode {
            MaskArg::Center => MaskMode::Center,
            MaskArg::Subpixel => MaskMode::Subpixels(self.subpixels),
        };
        let fits_bitpix = if self.single_precision {
            FitsBitpix::Float32
        } else {
            FitsBitpix::Float64
        };

        FringeConfig::builder()
            .fringe_scale(self.fringe_scale)
            .output_suffix(self.suffix.clone())
            .output_format(output_format)
            .fits_bitpix(fits_bitpix)
            .tiff_compression(tiff_compression)
            .mask_mode(mask_mode)
            .build()
    }
}

fn run(cli: &Cli) -> Result<()> {
    let pipeline = FringeRemovalPipeline::new(cli.config());
    info!("Mask mode: {:?}", pipeline.config().mask_mode);

    let report = pipeline
        .remove_fringe_file(&cli.image, &cli.fringe, &cli.regions)
        .with_context(|| format!("Failed to defringe {}", cli.image.display()))?;

    info!(
        "Baseline {:.4}, fringe contrast {:.4}, image contrast {:.4}, scale {:.6}",
        report.correction.baseline,
        report.correction.fringe_contrast,
        report.correction.image_contrast,
        report.correction.scale
    );
    if cli.timings {
        report.timings.log_summary();
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    logger::init_with_level(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
