use super::SampleStatsRow;
use crate::error::{ReportError, ReportResult};
use crate::utils::fasta::open_fasta;
use std::path::Path;

/// Protein-calling summary for one sample, taken from its translated FASTA.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProteinStats {
    pub count: usize,
    pub total_length: usize,
}

impl ProteinStats {
    pub fn from_fasta(path: &Path) -> ReportResult<Self> {
        let reader = open_fasta(path)?;
        let mut stats = ProteinStats::default();
        for record in reader.records() {
            let record = record.map_err(|e| ReportError::io(path, e))?;
            stats.add(record.seq());
        }
        Ok(stats)
    }

    /// Count one translation; the stop symbol is not part of the length.
    pub fn add(&mut self, seq: &[u8]) {
        let trimmed = seq
            .iter()
            .rposition(|&b| b != b'*')
            .map_or(0, |last| last + 1);
        self.count += 1;
        self.total_length += trimmed;
    }

    pub fn average_length(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some((self.total_length as f64 / self.count as f64 * 100.0).round() / 100.0)
    }

    pub fn to_row(&self) -> SampleStatsRow {
        let mut row = SampleStatsRow::new();
        row.insert("Protein Count (Total)", self.count);
        if let Some(avg) = self.average_length() {
            row.insert("Average Protein Length", avg);
        }
        row
    }
}
