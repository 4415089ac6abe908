pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod lookup;
pub mod pipeline;
pub mod report;

pub use error::{AppError, LookupError, Result};
pub use pipeline::{MovieAverages, Pipeline};
