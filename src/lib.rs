pub mod fringe_pipeline;
pub mod logger;
