//! Field extraction from the free-text logs of upstream pipeline steps.
//!
//! Every template is an [`ExtractorRule`]: a pattern plus a mapping from
//! capture groups to metric names. Rules are applied independently and a
//! rule whose pattern does not match contributes nothing, so a partially
//! written log still yields whatever fields it does contain.

use super::SampleStatsRow;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const GC_PATTERN: &str = r"GC count:\s*([0-9]*)[\w\s]*%:\s*([.0-9]*)";
const N_STATS_PATTERN: &str = r"N25[\w\s:%()]*>= ([0-9]*)[\w\s:%()]*>= ([0-9]*)[\w\s:%()]*>= ([0-9]*)[\w\s:%()]*>= ([0-9]*)";
const MIN_MAX_PATTERN: &str = r"Max.*:.([0-9]*)\nMin.*:.([0-9]*)";
const TRIM_PATTERN: &str = r"Filtering result:[\w\s]*: ([0-9]*)[\w\s]*: ([0-9]*)[\w\s]*: ([0-9]*)[\w\s]*: ([0-9]*)[\w\s]*: ([0-9]*)[\w\s]*: ([0-9]*)[\w\s]*: ([0-9]*)[\w\s]*: ([0-9]*)";
const DECON_PATTERN: &str = concat!(
    r"([0-9]*) reads \([0-9%.]*\)\s*([0-9]*)[\w\s()\-.%]*:",
    r"\s*([0-9]*) reads \([0-9%.]*\)\s*([0-9]*)[\w\s()\-.%]*:",
    r"\s*([0-9]*) reads \([0-9%.]*\)\s*([0-9]*)[\w\s()\-.%]*:",
    r"\s*([0-9]*) reads \([0-9%.]*\)\s*([0-9]*)"
);

const TRIM_LABELS: [&str; 8] = [
    "passed",
    "low quality",
    "too many Ns",
    "too short",
    "low complexity",
    "adapter trimmed",
    "bases: adapters",
    "duplication rate %",
];
const DECON_LABELS: [&str; 4] = ["contaminants", "QTrimmed", "Total Removed", "Results"];

/// One named extraction template.
#[derive(Debug, Clone)]
pub struct ExtractorRule {
    pub name: &'static str,
    pattern: Regex,
    /// (capture group index, metric name)
    fields: Vec<(usize, String)>,
}

impl ExtractorRule {
    pub fn new(name: &'static str, pattern: &str, fields: Vec<(usize, String)>) -> Self {
        ExtractorRule {
            name,
            pattern: Regex::new(pattern).expect("extractor patterns are static"),
            fields,
        }
    }

    /// Apply the rule to `text`. Returns `None` when the pattern is absent;
    /// empty captures are left out of the partial row.
    pub fn extract(&self, text: &str) -> Option<SampleStatsRow> {
        let caps = self.pattern.captures(text)?;
        let mut row = SampleStatsRow::new();
        for (group, field) in &self.fields {
            if let Some(m) = caps.get(*group) {
                if !m.as_str().is_empty() {
                    row.insert(field.clone(), m.as_str());
                }
            }
        }
        if row.is_empty() {
            None
        } else {
            Some(row)
        }
    }
}

fn numbered(labels: &[&str]) -> Vec<(usize, String)> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| (i + 1, label.to_string()))
        .collect()
}

pub fn gc_rule() -> ExtractorRule {
    ExtractorRule::new("gc", GC_PATTERN, numbered(&["GC count", "GC %"]))
}

pub fn n_stats_rule() -> ExtractorRule {
    ExtractorRule::new("n_stats", N_STATS_PATTERN, numbered(&["N25", "N50", "N75", "N90"]))
}

pub fn min_max_rule() -> ExtractorRule {
    ExtractorRule::new(
        "min_max",
        MIN_MAX_PATTERN,
        vec![
            (2, "Contig Min Length".to_string()),
            (1, "Contig Max Length".to_string()),
        ],
    )
}

pub fn trim_rule() -> ExtractorRule {
    let fields = TRIM_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| (i + 1, format!("trim: {}", label)))
        .collect();
    ExtractorRule::new("trim", TRIM_PATTERN, fields)
}

pub fn decon_rule() -> ExtractorRule {
    let mut fields = Vec::with_capacity(DECON_LABELS.len() * 2);
    for (i, label) in DECON_LABELS.iter().enumerate() {
        fields.push((i * 2 + 1, format!("decon: reads {}", label)));
        fields.push((i * 2 + 2, format!("decon: bases {}", label)));
    }
    ExtractorRule::new("decon", DECON_PATTERN, fields)
}

/// Union of the partial rows produced by `rules`. Later rules win on a key
/// collision, which does not happen with the built-in templates.
pub fn apply_rules(rules: &[ExtractorRule], text: &str) -> SampleStatsRow {
    let mut row = SampleStatsRow::new();
    for rule in rules {
        match rule.extract(text) {
            Some(partial) => row.extend(partial),
            None => debug!("extractor '{}' found no match", rule.name),
        }
    }
    row
}

pub struct LogStatsParser {
    read_stats: Vec<ExtractorRule>,
    trim: ExtractorRule,
    decon: ExtractorRule,
}

impl Default for LogStatsParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogStatsParser {
    pub fn new() -> Self {
        LogStatsParser {
            read_stats: vec![gc_rule(), n_stats_rule(), min_max_rule()],
            trim: trim_rule(),
            decon: decon_rule(),
        }
    }

    /// GC, length percentiles and min/max from the assembly-statistics text.
    pub fn parse_read_stats(&self, text: &str) -> SampleStatsRow {
        apply_rules(&self.read_stats, text)
    }

    pub fn parse_trim_log(&self, text: &str) -> SampleStatsRow {
        apply_rules(std::slice::from_ref(&self.trim), text)
    }

    pub fn parse_decon_log(&self, text: &str) -> SampleStatsRow {
        apply_rules(std::slice::from_ref(&self.decon), text)
    }
}

/// Read an optional step log. Absence is normal (the step may not have run);
/// other read failures are logged and treated the same way.
pub fn read_optional_log(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no log at {}", path.display());
            None
        }
        Err(e) => {
            warn!("could not read {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatValue;

    const READ_STATS: &str = "\
Total contigs: 120
GC count: 1000000
GC %: 45.2
N25 (25% of total length) >= 5000
N50 (50% of total length) >= 3000
N75 (75% of total length) >= 1500
N90 (90% of total length) >= 800
Max contig length: 90000
Min contig length: 200
";

    fn text(row: &SampleStatsRow, key: &str) -> Option<String> {
        row.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_gc_fields_extracted_as_text() {
        let row = LogStatsParser::new().parse_read_stats(READ_STATS);
        assert_eq!(row.get("GC count"), Some(&StatValue::Text("1000000".into())));
        assert_eq!(text(&row, "GC %").as_deref(), Some("45.2"));
    }

    #[test]
    fn test_missing_gc_line_leaves_fields_absent() {
        let without_gc: String = READ_STATS
            .lines()
            .filter(|l| !l.starts_with("GC"))
            .map(|l| format!("{}\n", l))
            .collect();
        let row = LogStatsParser::new().parse_read_stats(&without_gc);
        assert!(!row.contains("GC count"));
        assert!(!row.contains("GC %"));
        assert_eq!(text(&row, "N50").as_deref(), Some("3000"));
    }

    #[test]
    fn test_length_percentiles_and_min_max() {
        let row = LogStatsParser::new().parse_read_stats(READ_STATS);
        assert_eq!(text(&row, "N25").as_deref(), Some("5000"));
        assert_eq!(text(&row, "N90").as_deref(), Some("800"));
        assert_eq!(text(&row, "Contig Max Length").as_deref(), Some("90000"));
        assert_eq!(text(&row, "Contig Min Length").as_deref(), Some("200"));
    }

    #[test]
    fn test_trim_log() {
        let log = "\
Read1 before filtering:
total reads: 2000

Filtering result:
reads passed filter: 1980
reads failed due to low quality: 10
reads failed due to too many N: 0
reads failed due to too short: 10
reads failed due to low complexity: 0
reads with adapter trimmed: 50
bases trimmed due to adapters: 600

Duplication rate: 1.5%
";
        let row = LogStatsParser::new().parse_trim_log(log);
        assert_eq!(row.len(), 8);
        assert_eq!(text(&row, "trim: passed").as_deref(), Some("1980"));
        assert_eq!(text(&row, "trim: bases: adapters").as_deref(), Some("600"));
        assert_eq!(text(&row, "trim: duplication rate %").as_deref(), Some("1"));
    }

    #[test]
    fn test_decon_log() {
        let log = "\
Input:                  \t1000 reads \t\t150000 bases.
Contaminants:           \t10 reads (1.00%) \t1500 bases (1.00%)
QTrimmed:               \t5 reads (0.50%) \t700 bases (0.47%)
Total Removed:          \t15 reads (1.50%) \t2200 bases (1.47%)
Result:                 \t985 reads (98.50%) \t147800 bases (98.53%)
";
        let row = LogStatsParser::new().parse_decon_log(log);
        assert_eq!(text(&row, "decon: reads contaminants").as_deref(), Some("10"));
        assert_eq!(text(&row, "decon: bases contaminants").as_deref(), Some("1500"));
        assert_eq!(text(&row, "decon: reads Total Removed").as_deref(), Some("15"));
        assert_eq!(text(&row, "decon: bases Results").as_deref(), Some("147800"));
    }

    #[test]
    fn test_unrelated_text_yields_empty_row() {
        let parser = LogStatsParser::new();
        assert!(parser.parse_trim_log("nothing to see").is_empty());
        assert!(parser.parse_decon_log("").is_empty());
    }
}
