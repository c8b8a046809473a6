use crate::cli::SamplePath;
use crate::config::Config;
use crate::export::write_combined;
use crate::report::{write_report, ReportResources};
use crate::stats::{scan_n_repeats, NRepeatMap, ProteinStats, SampleStatsRow, StatsMerger};
use crate::utils::external_tools::{collect_read_stats, ReadStatsTool};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{bail, Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct StatsOptions {
    pub samples: Vec<SamplePath>,
    pub proteins: Vec<SamplePath>,
    pub out: Option<PathBuf>,
    pub verbose: bool,
}

fn protein_rows(
    proteins: &[SamplePath],
    verbose: bool,
) -> Result<BTreeMap<String, SampleStatsRow>> {
    let progress = ProgressBarBuilder::new("Counting proteins")
        .with_length(proteins.len() as u64)
        .hidden(verbose)
        .build()?;

    let mut rows = BTreeMap::new();
    for entry in proteins {
        progress.set_message(entry.sample.clone());
        let stats = ProteinStats::from_fasta(&entry.path)
            .with_context(|| format!("Failed to read proteins of {}", entry.sample))?;
        debug!("{}: {} proteins", entry.sample, stats.count);
        rows.insert(entry.sample.clone(), stats.to_row());
        progress.inc(1);
    }
    progress.finish_and_clear();
    Ok(rows)
}

fn n_repeat_maps(
    samples: &[SamplePath],
    verbose: bool,
) -> Result<BTreeMap<String, NRepeatMap>> {
    let progress = ProgressBarBuilder::new("Scanning N-repeats")
        .with_length(samples.len() as u64)
        .hidden(verbose)
        .build()?;

    let mut maps = BTreeMap::new();
    for entry in samples {
        progress.set_message(entry.sample.clone());
        let map = scan_n_repeats(&entry.path)
            .with_context(|| format!("Failed to scan contigs of {}", entry.sample))?;
        maps.insert(entry.sample.clone(), map);
        progress.inc(1);
    }
    progress.finish_and_clear();
    Ok(maps)
}

fn run_read_stats(
    config: &Config,
    samples: &[SamplePath],
    verbose: bool,
) -> Result<BTreeMap<String, String>> {
    let tool = ReadStatsTool::from_config(config);
    let progress = ProgressBarBuilder::new(format!("Running {}", config.read_stats_exe))
        .with_tick()
        .hidden(verbose)
        .build()?;

    let pairs: Vec<(String, PathBuf)> = samples
        .iter()
        .map(|s| (s.sample.clone(), s.path.clone()))
        .collect();
    let stats = collect_read_stats(&tool, &pairs, &config.read_stats_dir());

    progress.finish_and_clear();
    info!("read stats for {} of {} samples", stats.len(), samples.len());
    Ok(stats)
}

fn check_unique(samples: &[SamplePath], what: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in samples {
        if !seen.insert(entry.sample.as_str()) {
            bail!("sample '{}' given twice in {}", entry.sample, what);
        }
    }
    Ok(())
}

pub fn run(config: &Config, options: StatsOptions) -> Result<()> {
    check_unique(&options.samples, "--samples")?;
    check_unique(&options.proteins, "--proteins")?;

    let outpath = options.out.clone().unwrap_or_else(|| config.report_dir());

    let read_stats = run_read_stats(config, &options.samples, options.verbose)?;
    let n_stats = n_repeat_maps(&options.samples, options.verbose)?;
    let protein_stats = protein_rows(&options.proteins, options.verbose)?;

    let table = StatsMerger::from_config(config)
        .merge(&outpath, &protein_stats, &read_stats, &n_stats)
        .context("Failed to merge sample statistics")?;

    let combined = write_combined(&table, &outpath)
        .with_context(|| format!("Failed to write combined stats under {}", outpath.display()))?;

    let resources = ReportResources::from_config(config).context("Failed to load report resources")?;
    let report = write_report(&table, &outpath, &resources).context("Failed to write the stats report")?;

    print_outputs(&[
        ("Table", combined.tsv.as_path()),
        ("JSON", combined.json.as_path()),
        ("Report", report.html.as_path()),
    ]);
    println!("Charts:  {}", report.charts.len());
    Ok(())
}

fn print_outputs(outputs: &[(&str, &Path)]) {
    for (label, path) in outputs {
        println!("{:<8} {}", format!("{}:", label), path.display());
    }
}
