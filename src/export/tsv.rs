use crate::error::{ReportError, ReportResult};
use crate::stats::StatsTable;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// One row per sample under a `Sample` + columns header. Absent metrics are
/// empty cells.
pub fn write_stats_tsv(table: &StatsTable, path: &Path) -> ReportResult<()> {
    let file = File::create(path).map_err(|e| ReportError::io(path, e))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(BufWriter::new(file));

    let columns = table.columns();
    let mut header = vec!["Sample"];
    header.extend(columns.iter().map(String::as_str));
    writer.write_record(&header)?;

    for sample in table.samples() {
        let row = table.row(sample);
        let mut record = vec![sample.clone()];
        record.extend(columns.iter().map(|column| {
            row.and_then(|r| r.get(column))
                .map(|value| value.to_string())
                .unwrap_or_default()
        }));
        writer.write_record(&record)?;
    }

    writer.flush().map_err(|e| ReportError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_absent_values_are_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.tsv");

        let mut table = StatsTable::new();
        table.row_mut("s1").insert("GC %", "45.2");
        table.row_mut("s2").insert("N50", "800");
        write_stats_tsv(&table, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Sample\tGC %\tN50");
        assert_eq!(lines[1], "s1\t45.2\t");
        assert_eq!(lines[2], "s2\t\t800");
    }
}
