use metareport_tools::annotation::{write_datafiles, FeatureInputs, FeatureOutputs, SynthesisSummary};
use metareport_tools::ReportError;
use std::fs;
use std::path::Path;

const GFF: &str = "\
##gff-version 3
contig_1\tProdigal\tCDS\t1\t9\t.\t+\t0\tID=1_1
contig_1\tProdigal\tCDS\t10\t18\t.\t-\t0\tID=1_2
contig_2\tProdigal\tCDS\t2\t7\t.\t+\t.\tID=2_1
";

const FASTA: &str = "\
>contig_1 length=18
ACGTACGTAC
GTACGTAC
>contig_2
NNNNACGT
";

const AMINO: &str = "\
>contig_1_1 # 1 # 9 # 1
MKV*
>contig_1_2 # 10 # 18 # -1
MSS*
";

fn summary() -> String {
    let mut text = String::from(
        "target\tname\talias\tdbxref\tevalue\tscore\tEC\tcov\tlen\tx\tstart\tend\tlength\n",
    );
    for (id, name) in [
        ("contig_1_1", "alcohol dehydrogenase"),
        ("contig_1_2", "elongation factor Tu"),
        ("contig_2_1", "hypothetical protein"),
    ] {
        text.push_str(&format!(
            "{id}\t{name}\tK00001\tKEGG:K00001\t1e-20\t80\t1.1.1.1\t0.95\t3\t-\t1\t3\t3\n"
        ));
    }
    text
}

fn inputs(dir: &Path, summary: &str) -> FeatureInputs {
    let write = |name: &str, content: &str| {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    };
    FeatureInputs {
        gff: write("features.gff", GFF),
        summary: write("summary.tsv", summary),
        fasta: write("contigs.fna", FASTA),
        amino: write("proteins.faa", AMINO),
    }
}

#[test]
fn test_annotated_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = inputs(dir.path(), &summary());
    let outputs = FeatureOutputs::new(dir.path().join("out.gff"), dir.path().join("out.gbk"));
    assert_eq!(outputs.gtf, dir.path().join("out.gtf"));

    let result = write_datafiles(&inputs, &outputs).unwrap();
    assert_eq!(
        result,
        SynthesisSummary {
            features: 3,
            contigs: 2,
            indexed_proteins: 2,
        }
    );

    let gff = fs::read_to_string(&outputs.gff).unwrap();
    let lines: Vec<_> = gff.lines().collect();
    assert_eq!(lines[0], "##gff-version 3");
    assert!(lines[1].ends_with(
        "\tID=contig_1_1;Name=alcohol dehydrogenase;Alias=K00001;Dbxref=KEGG:K00001;evalue=1e-20;product_start=1;product_end=3;product_length=3"
    ));
    assert_eq!(lines[4], "##FASTA");
    assert_eq!(lines[5..].join("\n") + "\n", FASTA);

    let gtf = fs::read_to_string(&outputs.gtf).unwrap();
    let gtf_lines: Vec<_> = gtf.lines().collect();
    assert_eq!(gtf_lines[0], "##gff-version 2");
    assert_eq!(gtf_lines.len(), 4);
    assert_eq!(gtf_lines[1], lines[1]);
}

#[test]
fn test_genbank_records() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = inputs(dir.path(), &summary());
    let outputs = FeatureOutputs::new(dir.path().join("out.gff"), dir.path().join("out.gbk"));
    write_datafiles(&inputs, &outputs).unwrap();

    let genbank = fs::read_to_string(&outputs.genbank).unwrap();
    let records: Vec<_> = genbank.split_terminator("//\n").collect();
    assert_eq!(records.len(), 2);

    let first = records[0];
    assert!(first.starts_with("LOCUS       contig_1     18 bp\n"));
    assert!(first.contains("FEATURES             Location/Qualifiers\n"));
    assert!(first.contains("     source          1..18\n"));
    assert!(first.contains("     CDS             1..9\n"));
    assert!(first.contains("     CDS             complement(10..18)\n"));
    assert!(first.contains("                     /codon_start=1\n"));
    assert!(first.contains("                     /product=\"alcohol dehydrogenase\"\n"));
    assert!(first.contains("                     /db_xref=\"KEGG:K00001\"\n"));
    assert!(first.contains("                     /translation=\"MKV\"\n"));
    assert!(first.contains("                     /translation=\"MSS\"\n"));
    assert!(first.ends_with("ORIGIN      \n        1 ACGTACGTAC GTACGTAC\n"));

    let second = records[1];
    assert!(second.starts_with("LOCUS       contig_2     8 bp\n"));
    assert!(second.contains("     CDS             2..7\n"));
    assert!(!second.contains("/translation"));
}

#[test]
fn test_misaligned_summary_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let short: String = summary().lines().take(3).map(|l| format!("{}\n", l)).collect();
    let inputs = inputs(dir.path(), &short);
    let outputs = FeatureOutputs::new(dir.path().join("out.gff"), dir.path().join("out.gbk"));

    let err = write_datafiles(&inputs, &outputs).unwrap_err();
    assert!(matches!(err, ReportError::MisalignedSummary { line: 4, .. }));
}

#[test]
fn test_missing_protein_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut inputs = inputs(dir.path(), &summary());
    inputs.amino = dir.path().join("absent.faa");
    let outputs = FeatureOutputs::new(dir.path().join("out.gff"), dir.path().join("out.gbk"));

    let err = write_datafiles(&inputs, &outputs).unwrap_err();
    assert!(matches!(err, ReportError::MissingInput(_)));
}
