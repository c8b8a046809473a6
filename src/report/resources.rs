use crate::config::Config;
use crate::error::{ReportError, ReportResult};
use std::fs;
use std::path::PathBuf;

const DEFAULT_STYLESHEET: &str = include_str!("templates/style.css");

/// Stylesheet and logo handed to the page writer.
#[derive(Debug, Clone)]
pub struct ReportResources {
    pub stylesheet: String,
    pub logo: Option<PathBuf>,
}

impl Default for ReportResources {
    fn default() -> Self {
        ReportResources {
            stylesheet: DEFAULT_STYLESHEET.to_string(),
            logo: None,
        }
    }
}

impl ReportResources {
    /// The bundled stylesheet unless the configuration names another one.
    pub fn from_config(config: &Config) -> ReportResult<Self> {
        let stylesheet = match &config.stylesheet {
            Some(path) => fs::read_to_string(path).map_err(|e| ReportError::input(path, e))?,
            None => DEFAULT_STYLESHEET.to_string(),
        };
        Ok(ReportResources {
            stylesheet,
            logo: config.logo.clone(),
        })
    }
}
