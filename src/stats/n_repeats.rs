use super::SampleStatsRow;
use crate::error::{ReportError, ReportResult};
use crate::utils::fasta::open_fasta;
use std::collections::BTreeMap;
use std::path::Path;

/// Contig id -> lengths of each run of ambiguous bases, in sequence order.
pub type NRepeatMap = BTreeMap<String, Vec<usize>>;

#[derive(Debug, Clone, PartialEq)]
pub struct NRepeatSummary {
    pub contigs: usize,
    pub repeat_count: usize,
    pub total_length: usize,
    /// `None` when there are no repeats at all.
    pub mean_length: Option<f64>,
}

impl NRepeatSummary {
    pub fn from_map(map: &NRepeatMap) -> Self {
        let repeat_count: usize = map.values().map(Vec::len).sum();
        let total_length: usize = map.values().flatten().sum();
        let mean_length = if repeat_count > 0 {
            Some(round2(total_length as f64 / repeat_count as f64))
        } else {
            None
        };

        NRepeatSummary {
            contigs: map.len(),
            repeat_count,
            total_length,
            mean_length,
        }
    }

    pub fn to_row(&self) -> SampleStatsRow {
        let mut row = SampleStatsRow::new();
        row.insert("Contigs w/ N-repeats:", self.contigs);
        row.insert("N-repeat Count", self.repeat_count);
        row.insert("N-repeat Total Length", self.total_length);
        if let Some(mean) = self.mean_length {
            row.insert("N-repeat Average", mean);
        }
        row
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Lengths of maximal `N`/`n` runs in `seq`.
pub fn n_runs(seq: &[u8]) -> Vec<usize> {
    let mut runs = Vec::new();
    let mut current = 0usize;
    for &base in seq {
        if base == b'N' || base == b'n' {
            current += 1;
        } else if current > 0 {
            runs.push(current);
            current = 0;
        }
    }
    if current > 0 {
        runs.push(current);
    }
    runs
}

/// Build the repeat map for a nucleotide FASTA. Contigs without any run
/// are left out, so the map size is the number of contigs with repeats.
pub fn scan_n_repeats(path: &Path) -> ReportResult<NRepeatMap> {
    let reader = open_fasta(path)?;
    let mut map = NRepeatMap::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReportError::io(path, e))?;
        let runs = n_runs(record.seq());
        if !runs.is_empty() {
            map.insert(record.id().to_string(), runs);
        }
    }
    Ok(map)
}
