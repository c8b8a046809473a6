pub mod annotate;
pub mod init_config;
pub mod stats;
pub mod tables;

use crate::config::Config;
use anyhow::Result;
use std::path::Path;

/// An explicit `--config` must parse; otherwise fall back to the user file
/// or the defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Ok(Config::load()),
    }
}
