//! Fill pipeline.
//!
//! - `executor`: the [`FillEngine`] that applies a strategy to a dataset
//! - `job`: a full file run (load, fill, write, log)

mod executor;
mod job;

pub use executor::FillEngine;
pub use job::{FillRun, display_file_name};
