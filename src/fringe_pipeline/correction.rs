//! Fringe correction module
//!
//! The pure correction (`remove_fringe`) and the file-level pipeline that
//! loads its inputs, runs it and persists the corrected image.

mod algorithm;
mod pipeline;
mod timing;
pub mod types;


pub use algorithm::{remove_fringe, FringeCorrection};
pub use pipeline::{FringeRemovalPipeline, FringeReport, OutputWriter};
pub use timing::{PipelineTimings, StepTiming, Timer};
pub use types::{
    FringeConfig, FringeConfigBuilder, OutputFormat, DEFAULT_FRINGE_SCALE, DEFAULT_OUTPUT_SUFFIX,
    PROVENANCE_KEYWORD,
};
