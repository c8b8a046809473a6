//! Splits an annotation count table into one file per hierarchy level.

use crate::error::{ReportError, ReportResult};
use regex::Regex;
use serde::Deserialize;
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const FUNCTION_LEVEL: &str = "Function";

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationRow {
    #[serde(rename = "Level")]
    pub level: String,
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Count")]
    pub count: String,
}

impl AnnotationRow {
    fn numeric_level(&self) -> Option<u32> {
        if self.level == FUNCTION_LEVEL {
            return None;
        }
        self.level.trim().parse().ok()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LevelSplit {
    /// `<prefix>_level-<n>.tsv`, index 0 is level 1.
    pub level_files: Vec<PathBuf>,
    pub id_file: PathBuf,
}

impl LevelSplit {
    pub fn file_count(&self) -> usize {
        self.level_files.len() + 1
    }
}

fn prefixed(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = prefix.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

pub fn read_annotation_table(path: &Path) -> ReportResult<Vec<AnnotationRow>> {
    let file = File::open(path).map_err(|e| ReportError::input(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(file);

    reader
        .deserialize()
        .collect::<Result<Vec<AnnotationRow>, _>>()
        .map_err(|e| ReportError::MalformedTable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Write `<prefix>_level-<n>.tsv` (Name, Count) for every numeric level and
/// `<prefix>_level-id.tsv` (Id, Name, Count) for the `Function` rows.
///
/// The level count is established before anything is written, so a table
/// without numeric levels leaves no partial output behind.
pub fn split_levels(table_path: &Path, file_prefix: &Path) -> ReportResult<LevelSplit> {
    let mut rows = read_annotation_table(table_path)?;

    let level_tag = Regex::new(r"^lvl[0-9]: ").expect("static pattern");
    for row in rows.iter_mut() {
        row.name = level_tag.replace(&row.name, "").into_owned();
    }

    let max_level = rows
        .iter()
        .filter_map(AnnotationRow::numeric_level)
        .max()
        .ok_or_else(|| ReportError::MalformedTable {
            path: table_path.to_path_buf(),
            reason: "no numeric levels".to_string(),
        })?;
    debug!("{}: {} levels", table_path.display(), max_level);

    let mut split = LevelSplit::default();
    for level in 1..=max_level {
        let path = prefixed(file_prefix, &format!("_level-{}.tsv", level));
        let mut writer = tsv_writer(&path)?;
        writer.write_record(["Name", "Count"])?;
        for row in rows.iter().filter(|r| r.numeric_level() == Some(level)) {
            writer.write_record([&row.name, &row.count])?;
        }
        writer.flush().map_err(|e| ReportError::io(&path, e))?;
        split.level_files.push(path);
    }

    let ontology_tag = Regex::new(r"^K[0-9]*: ").expect("static pattern");
    let path = prefixed(file_prefix, "_level-id.tsv");
    let mut writer = tsv_writer(&path)?;
    writer.write_record(["Id", "Name", "Count"])?;
    for row in rows.iter().filter(|r| r.level == FUNCTION_LEVEL) {
        let name = ontology_tag.replace(&row.name, "");
        writer.write_record([row.id.as_str(), &*name, row.count.as_str()])?;
    }
    writer.flush().map_err(|e| ReportError::io(&path, e))?;
    split.id_file = path;

    info!(
        "split {} into {} level files",
        table_path.display(),
        split.file_count()
    );
    Ok(split)
}

fn tsv_writer(path: &Path) -> ReportResult<csv::Writer<File>> {
    let file = File::create(path).map_err(|e| ReportError::io(path, e))?;
    Ok(csv::WriterBuilder::new().delimiter(b'\t').from_writer(file))
}
