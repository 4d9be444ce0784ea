//! Pixel grid module
//!
//! In-memory 2D floating-point images shared by every pipeline stage.

pub mod types;

pub use types::PixelGrid;
