use crate::tables::split_levels;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run(table: &Path, prefix: &Path) -> Result<()> {
    let progress = ProgressBarBuilder::new(format!("Splitting {}", table.display())).build()?;

    let split = split_levels(table, prefix)
        .with_context(|| format!("Failed to split levels of {}", table.display()))?;

    progress.finish_with_message(format!("Wrote {} level tables", split.file_count()));
    for path in split.level_files.iter().chain(std::iter::once(&split.id_file)) {
        println!("{}", path.display());
    }
    Ok(())
}
