use super::features::{pair_features, FeatureGroups};
use super::genbank::write_record;
use super::protein_index::ProteinIndex;
use crate::error::{ReportError, ReportResult};
use niffler::get_reader;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Input files of one synthesis run.
#[derive(Debug, Clone)]
pub struct FeatureInputs {
    /// Feature table (GFF), first eight columns positional.
    pub gff: PathBuf,
    /// Per-feature summary, one row per GFF data line, with a header.
    pub summary: PathBuf,
    /// Contig FASTA, plain or compressed.
    pub fasta: PathBuf,
    /// Translated proteins; must be uncompressed for offset lookups.
    pub amino: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FeatureOutputs {
    pub gff: PathBuf,
    pub gtf: PathBuf,
    pub genbank: PathBuf,
}

impl FeatureOutputs {
    /// The GTF lands next to the GFF with the extension swapped.
    pub fn new(gff: impl Into<PathBuf>, genbank: impl Into<PathBuf>) -> Self {
        let gff = gff.into();
        FeatureOutputs {
            gtf: gff.with_extension("gtf"),
            gff,
            genbank: genbank.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesisSummary {
    pub features: usize,
    pub contigs: usize,
    pub indexed_proteins: usize,
}

fn create(path: &Path) -> ReportResult<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| ReportError::io(path, e))
}

fn open(path: &Path) -> ReportResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| ReportError::input(path, e))
}

/// Annotated GFF (with inlined `##FASTA`), GTF and GenBank from a feature
/// table, its summary, the contigs and their translations.
pub fn write_datafiles(
    inputs: &FeatureInputs,
    outputs: &FeatureOutputs,
) -> ReportResult<SynthesisSummary> {
    let proteins = ProteinIndex::build(&inputs.amino)?;
    debug!("indexed {} proteins from {}", proteins.len(), inputs.amino.display());

    let mut gff_out = create(&outputs.gff)?;
    let mut gtf_out = create(&outputs.gtf)?;
    writeln!(gtf_out, "##gff-version 2").map_err(|e| ReportError::io(&outputs.gtf, e))?;

    let groups = pair_features(
        open(&inputs.gff)?,
        open(&inputs.summary)?,
        &mut gff_out,
        &mut gtf_out,
    )?;
    gtf_out.flush().map_err(|e| ReportError::io(&outputs.gtf, e))?;

    let fasta_file = File::open(&inputs.fasta).map_err(|e| ReportError::input(&inputs.fasta, e))?;
    let (fasta_reader, _compression) = get_reader(Box::new(fasta_file))
        .map_err(|e| ReportError::io(&inputs.fasta, std::io::Error::other(e.to_string())))?;

    let mut genbank_out = create(&outputs.genbank)?;
    let contigs = write_sequences(
        BufReader::new(fasta_reader),
        &mut gff_out,
        &mut genbank_out,
        &groups,
        &proteins,
    )?;
    gff_out.flush().map_err(|e| ReportError::io(&outputs.gff, e))?;
    genbank_out
        .flush()
        .map_err(|e| ReportError::io(&outputs.genbank, e))?;

    let summary = SynthesisSummary {
        features: groups.len(),
        contigs,
        indexed_proteins: proteins.len(),
    };
    info!(
        "wrote {} features on {} contigs to {}",
        summary.features,
        summary.contigs,
        outputs.genbank.display()
    );
    Ok(summary)
}

/// Stream the contig FASTA one record at a time: raw lines go under
/// `##FASTA` in the GFF, and each record becomes one GenBank entry.
/// Returns the number of records.
pub fn write_sequences<R, G, B>(
    mut fasta: R,
    gff: &mut G,
    genbank: &mut B,
    groups: &FeatureGroups,
    proteins: &ProteinIndex,
) -> ReportResult<usize>
where
    R: BufRead,
    G: Write,
    B: Write,
{
    let gff_err = |e: std::io::Error| ReportError::io("<gff output>", e);
    let read_err = |e: std::io::Error| ReportError::io("<fasta>", e);

    writeln!(gff, "##FASTA").map_err(gff_err)?;

    let mut line = String::new();
    let mut header: Option<String> = None;
    let mut seq = String::new();
    let mut records = 0;

    loop {
        line.clear();
        let read = fasta.read_line(&mut line).map_err(read_err)?;
        let at_end = read == 0;

        if at_end || line.starts_with('>') {
            if let Some(locus) = header.take() {
                write_record(genbank, &locus, &seq, groups.get(&locus), proteins)?;
                records += 1;
            }
            if at_end {
                break;
            }
            gff.write_all(line.as_bytes()).map_err(gff_err)?;
            header = Some(
                line[1..]
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_string(),
            );
            seq.clear();
        } else if header.is_some() {
            gff.write_all(line.as_bytes()).map_err(gff_err)?;
            seq.push_str(line.trim());
        }
    }

    Ok(records)
}
