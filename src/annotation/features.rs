use crate::error::{ReportError, ReportResult};
use std::collections::HashMap;
use std::io::{BufRead, Write};

/// Summary columns copied into the attribute column.
const SUMMARY_ID: usize = 0;
const SUMMARY_NAME: usize = 1;
const SUMMARY_ALIAS: usize = 2;
const SUMMARY_DBXREF: usize = 3;
const SUMMARY_EVALUE: usize = 4;
const SUMMARY_PRODUCT_START: usize = 10;
const SUMMARY_PRODUCT_END: usize = 11;
const SUMMARY_PRODUCT_LENGTH: usize = 12;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureAttributes {
    pub id: String,
    pub name: String,
    pub alias: String,
    pub dbxref: String,
    pub evalue: String,
    pub product_start: String,
    pub product_end: String,
    pub product_length: String,
}

impl FeatureAttributes {
    pub fn from_summary_line(line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() <= SUMMARY_PRODUCT_LENGTH {
            return Err(format!(
                "expected at least {} columns, found {}",
                SUMMARY_PRODUCT_LENGTH + 1,
                fields.len()
            ));
        }
        let field = |i: usize| fields[i].to_string();
        Ok(FeatureAttributes {
            id: field(SUMMARY_ID),
            name: field(SUMMARY_NAME),
            alias: field(SUMMARY_ALIAS),
            dbxref: field(SUMMARY_DBXREF),
            evalue: field(SUMMARY_EVALUE),
            product_start: field(SUMMARY_PRODUCT_START),
            product_end: field(SUMMARY_PRODUCT_END),
            product_length: field(SUMMARY_PRODUCT_LENGTH),
        })
    }

    /// The `key=value;...` ninth column.
    pub fn to_attribute_string(&self) -> String {
        format!(
            "ID={};Name={};Alias={};Dbxref={};evalue={};product_start={};product_end={};product_length={}",
            self.id,
            self.name,
            self.alias,
            self.dbxref,
            self.evalue,
            self.product_start,
            self.product_end,
            self.product_length
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub seqid: String,
    pub source: String,
    pub feature_type: String,
    pub start: String,
    pub end: String,
    pub score: String,
    pub strand: String,
    pub frame: String,
    pub attributes: FeatureAttributes,
}

impl FeatureRecord {
    pub fn from_gff_line(line: &str, attributes: FeatureAttributes) -> Result<Self, String> {
        let mut cols = line.split('\t');
        let mut next = |name: &str| {
            cols.next()
                .map(str::to_string)
                .ok_or_else(|| format!("missing {} column", name))
        };
        let record = FeatureRecord {
            seqid: next("seqid")?,
            source: next("source")?,
            feature_type: next("type")?,
            start: next("start")?,
            end: next("end")?,
            score: next("score")?,
            strand: next("strand")?,
            frame: next("frame")?,
            attributes,
        };
        if !matches!(record.frame.trim(), "." | "0" | "1" | "2") {
            return Err(format!("invalid frame '{}'", record.frame));
        }
        Ok(record)
    }

    pub fn is_reverse(&self) -> bool {
        self.strand == "-"
    }

    /// GenBank codon_start: the 0-based GFF frame plus one. An
    /// unspecified frame (`.`) reads as frame 0.
    pub fn codon_start(&self) -> u8 {
        self.frame
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|frame| *frame <= 2)
            .map_or(1, |frame| frame + 1)
    }

    pub fn to_annotated_line(&self) -> String {
        let attributes = self.attributes.to_attribute_string();
        [
            self.seqid.as_str(),
            self.source.as_str(),
            self.feature_type.as_str(),
            self.start.as_str(),
            self.end.as_str(),
            self.score.as_str(),
            self.strand.as_str(),
            self.frame.as_str(),
            attributes.as_str(),
        ]
        .join("\t")
    }
}

/// Features per contig id, each list in input order.
#[derive(Debug, Default)]
pub struct FeatureGroups {
    by_seqid: HashMap<String, Vec<FeatureRecord>>,
    total: usize,
}

impl FeatureGroups {
    pub fn push(&mut self, record: FeatureRecord) {
        self.by_seqid
            .entry(record.seqid.clone())
            .or_default()
            .push(record);
        self.total += 1;
    }

    pub fn get(&self, seqid: &str) -> &[FeatureRecord] {
        self.by_seqid.get(seqid).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contigs(&self) -> usize {
        self.by_seqid.len()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

fn trim_line_end(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Walk the feature table and the summary table together.
///
/// Comment lines go to `gff` unchanged. Each data line takes the next
/// summary row; the annotated line is written to both `gff` and `gtf`.
/// The two tables must line up row for row: a summary that runs short,
/// runs long or has a short row is an error rather than a silent shift.
pub fn pair_features<F, S, G, T>(
    features: F,
    mut summary: S,
    gff: &mut G,
    gtf: &mut T,
) -> ReportResult<FeatureGroups>
where
    F: BufRead,
    S: BufRead,
    G: Write,
    T: Write,
{
    let write_err = |e: std::io::Error| ReportError::io("<feature output>", e);

    let mut header = String::new();
    summary
        .read_line(&mut header)
        .map_err(|e| ReportError::io("<summary>", e))?;
    let mut summary_rows = summary
        .lines()
        .filter(|l| l.as_ref().map_or(true, |l| !l.trim().is_empty()));

    let mut groups = FeatureGroups::default();
    let mut last_feature_line = 0;
    for (idx, line) in features.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| ReportError::io("<feature table>", e))?;
        if line.starts_with('#') {
            writeln!(gff, "{}", line).map_err(write_err)?;
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let summary_line = match summary_rows.next() {
            Some(row) => row.map_err(|e| ReportError::io("<summary>", e))?,
            None => {
                return Err(ReportError::MisalignedSummary {
                    line: line_no,
                    reason: "summary has no row for this feature".to_string(),
                })
            }
        };
        let attributes =
            FeatureAttributes::from_summary_line(trim_line_end(&summary_line)).map_err(|reason| {
                ReportError::MisalignedSummary {
                    line: line_no,
                    reason,
                }
            })?;
        let record = FeatureRecord::from_gff_line(trim_line_end(&line), attributes)
            .map_err(|reason| ReportError::MalformedFeature {
                line: line_no,
                reason,
            })?;

        let annotated = record.to_annotated_line();
        writeln!(gff, "{}", annotated).map_err(write_err)?;
        writeln!(gtf, "{}", annotated).map_err(write_err)?;
        groups.push(record);
        last_feature_line = line_no;
    }

    if summary_rows.next().is_some() {
        return Err(ReportError::MisalignedSummary {
            line: last_feature_line,
            reason: "summary has more rows than the feature table".to_string(),
        });
    }

    Ok(groups)
}
