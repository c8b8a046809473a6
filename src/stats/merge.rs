use super::log_parser::{read_optional_log, LogStatsParser};
use super::n_repeats::{NRepeatMap, NRepeatSummary};
use super::{SampleStatsRow, StatsTable};
use crate::config::Config;
use crate::error::{ReportError, ReportResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Combines the per-sample metric groups into one [`StatsTable`].
pub struct StatsMerger {
    parser: LogStatsParser,
    trim_dir: PathBuf,
    decon_dir: PathBuf,
}

impl StatsMerger {
    /// `trim_dir` and `decon_dir` hold one `<sample>/stderr.txt` per sample.
    pub fn new(trim_dir: impl Into<PathBuf>, decon_dir: impl Into<PathBuf>) -> Self {
        StatsMerger {
            parser: LogStatsParser::new(),
            trim_dir: trim_dir.into(),
            decon_dir: decon_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.trim_log_dir(), config.decon_log_dir())
    }

    /// Merge protein stats, raw read-stats text and N-repeat maps. Every
    /// sample seen in any input gets a row, and its trim and decontamination
    /// logs are read whether or not read stats exist for it. The raw text of
    /// each sample is kept verbatim in `<outpath>/<sample>/fasta_stats.txt`.
    pub fn merge(
        &self,
        outpath: &Path,
        protein_stats: &BTreeMap<String, SampleStatsRow>,
        read_stats: &BTreeMap<String, String>,
        n_stats: &BTreeMap<String, NRepeatMap>,
    ) -> ReportResult<StatsTable> {
        let mut table = StatsTable::new();
        let samples = protein_stats
            .keys()
            .chain(read_stats.keys())
            .chain(n_stats.keys());

        for sample in samples {
            if table.row(sample).is_some() {
                continue;
            }
            let row = table.row_mut(sample);

            if let Some(proteins) = protein_stats.get(sample) {
                row.extend(proteins.clone());
            }

            let text = read_stats.get(sample).map(String::as_str);
            let log_row = self.sample_log_stats(sample, text);
            debug!("{}: {} fields from logs", sample, log_row.len());
            row.extend(log_row);
            if let Some(text) = text {
                write_raw_stats(outpath, sample, text)?;
            }

            if let Some(map) = n_stats.get(sample) {
                row.extend(NRepeatSummary::from_map(map).to_row());
            }
        }

        info!(
            "merged {} samples into {} columns",
            table.samples().len(),
            table.columns().len()
        );
        Ok(table)
    }

    /// All log-derived fields for one sample; each group is independent and
    /// the read-stats group is skipped when there is no text for it.
    pub fn sample_log_stats(&self, sample: &str, read_stats: Option<&str>) -> SampleStatsRow {
        let mut row = read_stats
            .map(|text| self.parser.parse_read_stats(text))
            .unwrap_or_default();

        let trim_log = self.trim_dir.join(sample).join("stderr.txt");
        if let Some(text) = read_optional_log(&trim_log) {
            row.extend(self.parser.parse_trim_log(&text));
        }

        let decon_log = self.decon_dir.join(sample).join("stderr.txt");
        if let Some(text) = read_optional_log(&decon_log) {
            row.extend(self.parser.parse_decon_log(&text));
        }

        row
    }
}

fn write_raw_stats(outpath: &Path, sample: &str, text: &str) -> ReportResult<()> {
    let dir = outpath.join(sample);
    fs::create_dir_all(&dir).map_err(|e| ReportError::io(&dir, e))?;
    let file = dir.join("fasta_stats.txt");
    fs::write(&file, text).map_err(|e| ReportError::io(&file, e))
}

/// Group key of a sample: the leading run of ASCII letters plus the first
/// underscore (`cold_sample1` -> `cold_`). Without that shape the whole
/// name is its own key.
pub fn sample_group_prefix(sample: &str) -> &str {
    let letters = sample
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();
    if sample.as_bytes().get(letters) == Some(&b'_') {
        &sample[..=letters]
    } else {
        sample
    }
}

/// Name of a sample inside its group, with the group prefix removed.
pub fn sample_label(sample: &str) -> &str {
    let prefix = sample_group_prefix(sample);
    if prefix.len() < sample.len() {
        &sample[prefix.len()..]
    } else {
        sample
    }
}

/// Partition samples by [`sample_group_prefix`], keeping first-seen order
/// for groups and for members.
pub fn group_samples<S: AsRef<str>>(samples: &[S]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for sample in samples {
        let sample = sample.as_ref();
        let key = sample_group_prefix(sample);
        match groups.iter_mut().find(|(k, _)| k.as_str() == key) {
            Some((_, members)) => members.push(sample.to_string()),
            None => groups.push((key.to_string(), vec![sample.to_string()])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_grouping() {
        assert_eq!(sample_group_prefix("abc_x1"), "abc_");
        assert_eq!(sample_group_prefix("abc_x2"), "abc_");
        assert_eq!(sample_group_prefix("cold_sample_1"), "cold_");
        assert_eq!(sample_group_prefix("nounderscore"), "nounderscore");
        assert_eq!(sample_group_prefix("s1_x"), "s1_x");

        let groups = group_samples(&["abc_x1", "nounderscore", "abc_x2"]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "abc_");
        assert_eq!(groups[0].1, vec!["abc_x1", "abc_x2"]);
        assert_eq!(groups[1].0, "nounderscore");
        assert_eq!(groups[1].1, vec!["nounderscore"]);
    }

    #[test]
    fn test_sample_label() {
        assert_eq!(sample_label("cold_sample1"), "sample1");
        assert_eq!(sample_label("nounderscore"), "nounderscore");
    }
}
