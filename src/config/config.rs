use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the pipeline output tree; step directories live below it.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_read_stats_exe")]
    pub read_stats_exe: String,
    #[serde(default = "default_read_stats_interval")]
    pub read_stats_interval: u32,
    #[serde(default = "default_read_stats_step")]
    pub read_stats_step: String,
    #[serde(default = "default_trim_step")]
    pub trim_step: String,
    #[serde(default = "default_decon_step")]
    pub decon_step: String,
    #[serde(default = "default_report_step")]
    pub report_step: String,
    /// Overrides the bundled report stylesheet.
    #[serde(default)]
    pub stylesheet: Option<PathBuf>,
    /// Image shown in the report title; copied next to the page.
    #[serde(default)]
    pub logo: Option<PathBuf>,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("pipeline_out")
}

fn default_read_stats_exe() -> String {
    "countAssembly.py".to_string()
}

fn default_read_stats_interval() -> u32 {
    100
}

fn default_read_stats_step() -> String {
    "step_01-readStats".to_string()
}

fn default_trim_step() -> String {
    "step_03-trim".to_string()
}

fn default_decon_step() -> String {
    "step_04-decon".to_string()
}

fn default_report_step() -> String {
    "step_10-report".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            read_stats_exe: default_read_stats_exe(),
            read_stats_interval: default_read_stats_interval(),
            read_stats_step: default_read_stats_step(),
            trim_step: default_trim_step(),
            decon_step: default_decon_step(),
            report_step: default_report_step(),
            stylesheet: None,
            logo: None,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "metareport", "metareport-tools")
}

impl Config {
    /// User config file if present and valid, defaults otherwise.
    pub fn load() -> Self {
        if let Ok(config_path) = Self::default_path() {
            if config_path.exists() {
                if let Ok(content) = fs::read_to_string(config_path) {
                    if let Ok(config) = toml::from_str(&content) {
                        return config;
                    }
                }
            }
        }
        Config::default()
    }

    /// Explicitly requested config file; unlike [`Config::load`] a bad file is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// `config.toml` in the user config directory.
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = project_dirs().context("Failed to determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    pub fn read_stats_dir(&self) -> PathBuf {
        self.out_dir.join(&self.read_stats_step)
    }

    pub fn trim_log_dir(&self) -> PathBuf {
        self.out_dir.join(&self.trim_step)
    }

    pub fn decon_log_dir(&self) -> PathBuf {
        self.out_dir.join(&self.decon_step)
    }

    pub fn report_dir(&self) -> PathBuf {
        self.out_dir.join(&self.report_step)
    }
}
