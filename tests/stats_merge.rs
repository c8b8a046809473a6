use metareport_tools::export::write_combined;
use metareport_tools::report::{write_report, ReportResources};
use metareport_tools::stats::{
    group_samples, NRepeatMap, ProteinStats, SampleStatsRow, StatValue, StatsMerger,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

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

const TRIM_LOG: &str = "\
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

fn write_log(dir: &Path, sample: &str, text: &str) {
    let sample_dir = dir.join(sample);
    fs::create_dir_all(&sample_dir).unwrap();
    fs::write(sample_dir.join("stderr.txt"), text).unwrap();
}

struct Fixture {
    _dir: tempfile::TempDir,
    outpath: std::path::PathBuf,
    merger: StatsMerger,
    proteins: BTreeMap<String, SampleStatsRow>,
    read_stats: BTreeMap<String, String>,
    n_stats: BTreeMap<String, NRepeatMap>,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let trim_dir = dir.path().join("trim");
    let decon_dir = dir.path().join("decon");
    write_log(&trim_dir, "cold_s1", TRIM_LOG);

    let without_gc: String = READ_STATS
        .lines()
        .filter(|l| !l.starts_with("GC"))
        .map(|l| format!("{}\n", l))
        .collect();

    let mut read_stats = BTreeMap::new();
    read_stats.insert("cold_s1".to_string(), READ_STATS.to_string());
    read_stats.insert("cold_s2".to_string(), without_gc);

    let mut repeats = NRepeatMap::new();
    repeats.insert("contig_1".to_string(), vec![10, 5]);
    let mut n_stats = BTreeMap::new();
    n_stats.insert("cold_s1".to_string(), repeats);
    n_stats.insert("warm".to_string(), NRepeatMap::new());

    let protein_row = ProteinStats {
        count: 3,
        total_length: 300,
    }
    .to_row();
    let mut proteins = BTreeMap::new();
    proteins.insert("cold_s2".to_string(), protein_row.clone());
    proteins.insert("warm".to_string(), protein_row);

    Fixture {
        outpath: dir.path().join("report"),
        merger: StatsMerger::new(trim_dir, decon_dir),
        _dir: dir,
        proteins,
        read_stats,
        n_stats,
    }
}

#[test]
fn test_every_sample_from_any_input_gets_a_row() {
    let f = fixture();
    let table = f
        .merger
        .merge(&f.outpath, &f.proteins, &f.read_stats, &f.n_stats)
        .unwrap();

    let mut samples = table.samples().to_vec();
    samples.sort();
    assert_eq!(samples, vec!["cold_s1", "cold_s2", "warm"]);

    let s1 = table.row("cold_s1").unwrap();
    assert_eq!(s1.get("trim: passed").map(|v| v.to_string()).as_deref(), Some("1980"));
    assert_eq!(s1.get("N-repeat Average"), Some(&StatValue::Float(7.5)));
    assert_eq!(s1.get("Contigs w/ N-repeats:"), Some(&StatValue::Integer(1)));
    assert!(!s1.contains("Protein Count (Total)"));

    let s2 = table.row("cold_s2").unwrap();
    assert!(!s2.contains("GC %"));
    assert!(!s2.contains("trim: passed"));
    assert_eq!(s2.get("N50").map(|v| v.to_string()).as_deref(), Some("3000"));
    assert_eq!(s2.get("Protein Count (Total)"), Some(&StatValue::Integer(3)));

    let warm = table.row("warm").unwrap();
    assert_eq!(warm.get("N-repeat Count"), Some(&StatValue::Integer(0)));
    assert!(!warm.contains("N-repeat Average"));
}

#[test]
fn test_raw_read_stats_are_kept_per_sample() {
    let f = fixture();
    f.merger
        .merge(&f.outpath, &f.proteins, &f.read_stats, &f.n_stats)
        .unwrap();

    let kept = fs::read_to_string(f.outpath.join("cold_s1").join("fasta_stats.txt")).unwrap();
    assert_eq!(kept, READ_STATS);
    assert!(f.outpath.join("cold_s2").join("fasta_stats.txt").exists());
    assert!(!f.outpath.join("warm").join("fasta_stats.txt").exists());
}

#[test]
fn test_combined_outputs_and_report() {
    let f = fixture();
    let table = f
        .merger
        .merge(&f.outpath, &f.proteins, &f.read_stats, &f.n_stats)
        .unwrap();

    let combined = write_combined(&table, &f.outpath).unwrap();
    let tsv = fs::read_to_string(&combined.tsv).unwrap();
    let lines: Vec<_> = tsv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Sample\t"));
    assert_eq!(lines[0].split('\t').count(), table.columns().len() + 1);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&combined.json).unwrap()).unwrap();
    assert_eq!(json["samples"].as_array().unwrap().len(), 3);

    let report = write_report(&table, &f.outpath, &ReportResources::default()).unwrap();
    let html = fs::read_to_string(&report.html).unwrap();
    assert!(html.contains("GC (%) (cold)"));
    assert!(html.contains("ORF Calling Results (warm)"));
    assert!(html.contains("href=\"stats.tsv\""));

    let img = f.outpath.join("combined").join("img");
    assert!(img.join("GC (%) (cold).svg").exists());
    assert!(img.join("Assembly Stats (cold).svg").exists());
    assert!(!img.join("GC (%) (warm).svg").exists());
    assert_eq!(report.charts.len(), fs::read_dir(&img).unwrap().count());
}

#[test]
fn test_prefix_groups() {
    let groups = group_samples(&["abc_x1", "abc_x2", "nounderscore"]);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0], ("abc_".to_string(), vec!["abc_x1".to_string(), "abc_x2".to_string()]));
    assert_eq!(groups[1], ("nounderscore".to_string(), vec!["nounderscore".to_string()]));
}

#[test]
fn test_logs_are_read_without_read_stats() {
    let f = fixture();
    let no_read_stats = BTreeMap::new();
    let table = f
        .merger
        .merge(&f.outpath, &f.proteins, &no_read_stats, &f.n_stats)
        .unwrap();

    let s1 = table.row("cold_s1").unwrap();
    assert_eq!(s1.get("trim: passed").map(|v| v.to_string()).as_deref(), Some("1980"));
    assert_eq!(s1.get("N-repeat Count"), Some(&StatValue::Integer(2)));
    assert!(!s1.contains("GC %"));
    assert!(!f.outpath.join("cold_s1").join("fasta_stats.txt").exists());
}
