use crate::config::Config;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Write the defaults to `path`, or to the user config directory.
pub fn run(path: Option<&Path>, force: bool) -> Result<()> {
    let target: PathBuf = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()?,
    };
    if target.exists() && !force {
        bail!("{} already exists; pass --force to replace it", target.display());
    }

    Config::default().save_to(&target)?;
    println!("Configuration written to {}", target.display());
    Ok(())
}
