use std::path::{Path, PathBuf};

use tracing::{debug, info, info_span};

use crate::fringe_pipeline::common::error::{FringeError, Result};
use crate::fringe_pipeline::correction::algorithm::{remove_fringe, FringeCorrection};
use crate::fringe_pipeline::correction::timing::{PipelineTimings, Timer};
use crate::fringe_pipeline::correction::types::{FringeConfig, OutputFormat};
use crate::fringe_pipeline::fits::{FitsGridReader, FitsGridWriter, FitsHeader, GridReader, GridWriter};
use crate::fringe_pipeline::grid::PixelGrid;
use crate::fringe_pipeline::regions::{Ds9RegionReader, RegionReader, RegionSet};
use crate::fringe_pipeline::tiff::TiffGridWriter;

/// Writer selected by `FringeConfig::output_format`.
#[derive(Debug, Clone)]
pub enum OutputWriter {
    Fits(FitsGridWriter),
    Tiff(TiffGridWriter),
}

impl OutputWriter {
    pub fn from_config(config: &FringeConfig) -> Self {
        match config.output_format {
            OutputFormat::Fits => OutputWriter::Fits(FitsGridWriter::new(config.fits_bitpix)),
            OutputFormat::Tiff => OutputWriter::Tiff(TiffGridWriter::new(config.tiff_compression)),
        }
    }
}

impl GridWriter for OutputWriter {
    fn write_grid(&self, path: &Path, grid: &PixelGrid, header: &FitsHeader) -> Result<()> {
        match self {
            OutputWriter::Fits(writer) => writer.write_grid(path, grid, header),
            OutputWriter::Tiff(writer) => writer.write_grid(path, grid, header),
        }
    }

    fn extension(&self) -> &str {
        match self {
            OutputWriter::Fits(writer) => writer.extension(),
            OutputWriter::Tiff(writer) => writer.extension(),
        }
    }
}

/// Outcome of a file-level run.
#[derive(Debug)]
pub struct FringeReport {
    pub correction: FringeCorrection,
    pub output_path: PathBuf,
    pub timings: PipelineTimings,
}

pub struct FringeRemovalPipeline<R: GridReader, L: RegionReader, W: GridWriter> {
    reader: R,
    region_reader: L,
    writer: W,
    config: FringeConfig,
}

impl FringeRemovalPipeline<FitsGridReader, Ds9RegionReader, OutputWriter> {
    pub fn new(config: FringeConfig) -> Self {
        Self {
            reader: FitsGridReader,
            region_reader: Ds9RegionReader,
            writer: OutputWriter::from_config(&config),
            config,
        }
    }
}

impl<R: GridReader, L: RegionReader, W: GridWriter> FringeRemovalPipeline<R, L, W> {
    pub fn with_custom(reader: R, region_reader: L, writer: W, config: FringeConfig) -> Self {
        Self {
            reader,
            region_reader,
            writer,
            config,
        }
    }

    pub fn config(&self) -> &FringeConfig {
        &self.config
    }

    /// `<dir>/<stem><suffix>.<ext>` next to the input image.
    pub fn output_path(&self, image_path: &Path) -> PathBuf {
        let stem = image_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = format!(
            "{}{}.{}",
            stem,
            self.config.output_suffix,
            self.writer.extension()
        );
        image_path.with_file_name(file_name)
    }

    /// Reads the fringe frame and applies `fringe_scale` to it.
    pub fn load_fringe(&self, fringe_path: &Path) -> Result<PixelGrid> {
        let (mut fringe, _) = self.reader.read_grid(fringe_path)?;
        fringe.scale(self.config.fringe_scale);
        Ok(fringe)
    }

    /// Reads the region file and applies the bright/dark pairing.
    pub fn load_regions(&self, region_path: &Path) -> Result<RegionSet> {
        let regions = self
            .region_reader
            .read_regions(region_path, self.config.region_format)?;
        debug!("Read {} regions from {}", regions.len(), region_path.display());
        RegionSet::new(&regions, self.config.mask_mode)
    }

    /// Corrects the image at `image_path` and writes it next to the input.
    ///
    /// Nothing is written unless every step before the write succeeds.
    pub fn remove_fringe_file<P, Q, S>(
        &self,
        image_path: P,
        fringe_path: Q,
        region_path: S,
    ) -> Result<FringeReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        S: AsRef<Path>,
    {
        let image_path = image_path.as_ref();
        let fringe_path = fringe_path.as_ref();
        let region_path = region_path.as_ref();
        let _span = info_span!("remove_fringe_file", image = %image_path.display()).entered();

        for path in [image_path, fringe_path, region_path] {
            if !path.exists() {
                return Err(FringeError::InputNotFound(path.to_path_buf()));
            }
        }

        let mut timings = PipelineTimings::new();

        let timer = Timer::start("load_fringe");
        let fringe = self.load_fringe(fringe_path)?;
        timings.record(timer);

        let timer = Timer::start("load_regions");
        let regions = self.load_regions(region_path)?;
        timings.record(timer);

        let timer = Timer::start("load_image");
        let (image, mut header) = self.reader.read_grid(image_path)?;
        timings.record(timer);

        let timer = Timer::start("remove_fringe");
        let correction = remove_fringe(&image, fringe, &regions)?;
        timings.record(timer);

        header.set_logical(
            &self.config.provenance_key,
            true,
            Some("fringe pattern removed"),
        );

        let output_path = self.output_path(image_path);
        let timer = Timer::start("write_output");
        self.writer
            .write_grid(&output_path, &correction.corrected, &header)?;
        timings.record(timer);

        debug!(
            "Pipeline finished in {:.3}ms",
            timings.total_duration().as_secs_f64() * 1000.0
        );
        info!("Image defringed and saved to {}", output_path.display());
        Ok(FringeReport {
            correction,
            output_path,
            timings,
        })
    }
}
