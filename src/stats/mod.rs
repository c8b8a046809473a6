pub mod log_parser;
pub mod merge;
pub mod n_repeats;
pub mod protein;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

pub use log_parser::{ExtractorRule, LogStatsParser};
pub use merge::{group_samples, sample_group_prefix, StatsMerger};
pub use n_repeats::{scan_n_repeats, NRepeatMap, NRepeatSummary};
pub use protein::ProteinStats;

/// A single metric value. Captured log text stays text until a consumer
/// asks for a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl StatValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Integer(v) => Some(*v as f64),
            StatValue::Float(v) => Some(*v),
            StatValue::Text(s) => s.trim().trim_end_matches('%').parse().ok(),
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Integer(v) => write!(f, "{}", v),
            StatValue::Float(v) => write!(f, "{}", v),
            StatValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for StatValue {
    fn from(v: i64) -> Self {
        StatValue::Integer(v)
    }
}

impl From<usize> for StatValue {
    fn from(v: usize) -> Self {
        StatValue::Integer(v as i64)
    }
}

impl From<f64> for StatValue {
    fn from(v: f64) -> Self {
        StatValue::Float(v)
    }
}

impl From<&str> for StatValue {
    fn from(v: &str) -> Self {
        StatValue::Text(v.to_string())
    }
}

/// Metrics for one sample, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleStatsRow {
    fields: Vec<(String, StatValue)>,
}

impl SampleStatsRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a metric; a replaced metric keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StatValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&StatValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn extend(&mut self, other: SampleStatsRow) {
        for (key, value) in other.fields {
            self.insert(key, value);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Serialized as a map, keys in insertion order.
impl Serialize for SampleStatsRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The merged table: one row per sample, columns are the union of every
/// metric contributed by any sample, in first-seen order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsTable {
    samples: Vec<String>,
    rows: BTreeMap<String, SampleStatsRow>,
}

impl StatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_mut(&mut self, sample: &str) -> &mut SampleStatsRow {
        if !self.rows.contains_key(sample) {
            self.samples.push(sample.to_string());
        }
        self.rows.entry(sample.to_string()).or_default()
    }

    pub fn row(&self, sample: &str) -> Option<&SampleStatsRow> {
        self.rows.get(sample)
    }

    /// Sample ids in the order they were first added.
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn columns(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for sample in &self.samples {
            for key in self.rows[sample].keys() {
                if seen.insert(key.to_string()) {
                    columns.push(key.to_string());
                }
            }
        }
        columns
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
