//! Common utilities module
//!
//! This module contains shared utilities used across the fringe pipeline.

pub mod error;
pub mod output;

pub use error::{FringeError, Result};
pub use output::write_atomically;
