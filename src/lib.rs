pub mod annotation;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod report;
pub mod stats;
pub mod tables;
pub mod utils;

pub use error::{ReportError, ReportResult};
