pub mod tsv;

use crate::error::{ReportError, ReportResult};
use crate::stats::merge::sample_group_prefix;
use crate::stats::{SampleStatsRow, StatsTable};
use chrono::{DateTime, Utc};
use serde::ser::Serializer;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub use tsv::write_stats_tsv;

const EXPORT_VERSION: &str = "1.0";

/// Root of `stats.json`.
#[derive(Debug, Serialize)]
pub struct StatsExport<'a> {
    pub version: String,
    #[serde(serialize_with = "serialize_datetime")]
    pub created_at: DateTime<Utc>,
    pub tool_version: String,
    pub columns: Vec<String>,
    pub samples: Vec<SampleExport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SampleExport<'a> {
    pub sample: &'a str,
    pub group: &'a str,
    pub stats: &'a SampleStatsRow,
}

fn serialize_datetime<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.to_rfc3339())
}

impl<'a> StatsExport<'a> {
    pub fn new(table: &'a StatsTable, created_at: DateTime<Utc>) -> Self {
        let samples = table
            .samples()
            .iter()
            .filter_map(|sample| {
                table.row(sample).map(|stats| SampleExport {
                    sample: sample.as_str(),
                    group: sample_group_prefix(sample),
                    stats,
                })
            })
            .collect();

        StatsExport {
            version: EXPORT_VERSION.to_string(),
            created_at,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            columns: table.columns(),
            samples,
        }
    }
}

pub fn write_stats_json(table: &StatsTable, path: &Path) -> ReportResult<()> {
    let export = StatsExport::new(table, Utc::now());
    let json = serde_json::to_string_pretty(&export)?;
    fs::write(path, json).map_err(|e| ReportError::io(path, e))
}

/// Paths of the combined table files.
#[derive(Debug, Clone)]
pub struct CombinedOutputs {
    pub dir: PathBuf,
    pub tsv: PathBuf,
    pub json: PathBuf,
}

/// Write `stats.tsv` and `stats.json` under `<outpath>/combined`.
pub fn write_combined(table: &StatsTable, outpath: &Path) -> ReportResult<CombinedOutputs> {
    let dir = outpath.join("combined");
    fs::create_dir_all(&dir).map_err(|e| ReportError::io(&dir, e))?;

    let outputs = CombinedOutputs {
        tsv: dir.join("stats.tsv"),
        json: dir.join("stats.json"),
        dir,
    };
    write_stats_tsv(table, &outputs.tsv)?;
    write_stats_json(table, &outputs.json)?;
    Ok(outputs)
}
