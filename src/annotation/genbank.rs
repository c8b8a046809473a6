//! GenBank flat-file records for contigs and their annotated CDS features.

use super::features::FeatureRecord;
use super::protein_index::ProteinIndex;
use crate::error::{ReportError, ReportResult};
use std::io::Write;
use tracing::debug;

const HEADER_WIDTH: usize = 12;
const QUALIFIER_INDENT: usize = 21;
const TRANSLATION_WIDTH: usize = 48;
const ORIGIN_CHUNK: usize = 10;
const ORIGIN_CHUNKS_PER_LINE: usize = 6;

/// Location string of a feature, `complement(..)` on the reverse strand.
pub fn feature_location(feature: &FeatureRecord) -> String {
    if feature.is_reverse() {
        format!("complement({}..{})", feature.start, feature.end)
    } else {
        format!("{}..{}", feature.start, feature.end)
    }
}

/// Split the full `/translation="..."` qualifier into fixed-width pieces.
/// Trailing stop symbols are dropped first.
pub fn translation_lines(translation: &str) -> Vec<String> {
    let qualifier = format!("/translation=\"{}\"", translation.trim_end_matches('*'));
    qualifier
        .as_bytes()
        .chunks(TRANSLATION_WIDTH)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}

/// ORIGIN body lines: ten-base blocks, six per line, each line led by the
/// 1-based offset of its first base.
pub fn origin_lines(seq: &str) -> Vec<String> {
    seq.as_bytes()
        .chunks(ORIGIN_CHUNK * ORIGIN_CHUNKS_PER_LINE)
        .enumerate()
        .map(|(i, line)| {
            let blocks: Vec<_> = line
                .chunks(ORIGIN_CHUNK)
                .map(String::from_utf8_lossy)
                .collect();
            format!(
                "{:>9} {}",
                i * ORIGIN_CHUNK * ORIGIN_CHUNKS_PER_LINE + 1,
                blocks.join(" ")
            )
        })
        .collect()
}

fn write_header<W: Write>(writer: &mut W, locus: &str, length: usize) -> std::io::Result<()> {
    writeln!(writer, "{:<w$}{:<w$} {} bp", "LOCUS", locus, length, w = HEADER_WIDTH)?;
    for label in ["DEFINITION", "ACCESSION", "VERSION", "KEYWORDS", "SOURCE", "  ORGANISM"] {
        writeln!(writer, "{:<w$}", label, w = HEADER_WIDTH)?;
    }
    writeln!(writer, "{:<w$}1", "REFERENCE", w = HEADER_WIDTH)?;
    for label in ["  AUTHORS", "  TITLE", "  JOURNAL", "  PUBMED", "COMMENT"] {
        writeln!(writer, "{:<w$}", label, w = HEADER_WIDTH)?;
    }
    Ok(())
}

fn write_qualifier<W: Write>(writer: &mut W, text: &str) -> std::io::Result<()> {
    writeln!(writer, "{:<w$}{}", "", text, w = QUALIFIER_INDENT)
}

fn write_cds<W: Write>(
    writer: &mut W,
    feature: &FeatureRecord,
    proteins: &ProteinIndex,
) -> ReportResult<()> {
    let io = |e: std::io::Error| ReportError::io("<genbank output>", e);

    writeln!(
        writer,
        "{:<w$}{}",
        "     CDS",
        feature_location(feature),
        w = QUALIFIER_INDENT
    )
    .map_err(io)?;
    write_qualifier(writer, &format!("/codon_start={}", feature.codon_start())).map_err(io)?;
    write_qualifier(writer, &format!("/product=\"{}\"", feature.attributes.name)).map_err(io)?;
    write_qualifier(writer, &format!("/db_xref=\"{}\"", feature.attributes.dbxref)).map_err(io)?;

    if !proteins.contains(&feature.attributes.id) {
        debug!("no translation indexed for {}", feature.attributes.id);
        return Ok(());
    }
    if let Some(translation) = proteins.fetch(&feature.attributes.id)? {
        for line in translation_lines(&translation) {
            write_qualifier(writer, &line).map_err(io)?;
        }
    }
    Ok(())
}

/// One complete record: header, FEATURES table, ORIGIN and terminator.
pub fn write_record<W: Write>(
    writer: &mut W,
    locus: &str,
    seq: &str,
    features: &[FeatureRecord],
    proteins: &ProteinIndex,
) -> ReportResult<()> {
    let io = |e: std::io::Error| ReportError::io("<genbank output>", e);

    write_header(writer, locus, seq.len()).map_err(io)?;
    writeln!(writer, "{:<w$}Location/Qualifiers", "FEATURES", w = QUALIFIER_INDENT).map_err(io)?;
    writeln!(writer, "{:<w$}1..{}", "     source", seq.len(), w = QUALIFIER_INDENT).map_err(io)?;
    write_qualifier(writer, "/organism=\"\"").map_err(io)?;

    for feature in features {
        write_cds(writer, feature, proteins)?;
    }

    writeln!(writer, "{:<w$}", "ORIGIN", w = HEADER_WIDTH).map_err(io)?;
    for line in origin_lines(seq) {
        writeln!(writer, "{}", line).map_err(io)?;
    }
    writeln!(writer, "//").map_err(io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::features::FeatureAttributes;

    fn feature(strand: &str, frame: &str) -> FeatureRecord {
        let line = format!("c1\tProdigal\tCDS\t100\t200\t.\t{}\t{}", strand, frame);
        FeatureRecord::from_gff_line(&line, FeatureAttributes::default()).unwrap()
    }

    #[test]
    fn test_reverse_strand_location() {
        let f = feature("-", "0");
        assert_eq!(feature_location(&f), "complement(100..200)");
        assert_eq!(f.codon_start(), 1);
        assert_eq!(feature_location(&feature("+", "0")), "100..200");
    }

    #[test]
    fn test_translation_wrapping() {
        let protein = format!("{}*", "M".repeat(100));
        let lines = translation_lines(&protein);
        let joined: String = lines.concat();
        assert_eq!(joined, format!("/translation=\"{}\"", "M".repeat(100)));
        for line in &lines[..lines.len() - 1] {
            assert_eq!(line.len(), 48);
        }
        assert!(lines.last().unwrap().len() <= 48);
        assert!(!joined.contains('*'));
    }

    #[test]
    fn test_origin_layout() {
        let seq: String = "ACGTACGTAC".repeat(6) + "GGGCC";
        assert_eq!(seq.len(), 65);
        let lines = origin_lines(&seq);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("        1 "));
        assert_eq!(lines[0].split_whitespace().count(), 7);
        assert_eq!(lines[1], "       61 GGGCC");
    }

    #[test]
    fn test_origin_exact_line_has_no_trailing_empty_line() {
        let lines = origin_lines(&"A".repeat(60));
        assert_eq!(lines.len(), 1);
        assert!(origin_lines("").is_empty());
    }
}
