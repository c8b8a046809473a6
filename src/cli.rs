use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file (default: the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log every step at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// `sample=path` pair given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePath {
    pub sample: String,
    pub path: PathBuf,
}

pub fn parse_sample_path(s: &str) -> Result<SamplePath, String> {
    match s.split_once('=') {
        Some((sample, path)) if !sample.is_empty() && !path.is_empty() => Ok(SamplePath {
            sample: sample.to_string(),
            path: PathBuf::from(path),
        }),
        _ => Err(format!("expected SAMPLE=PATH, got '{}'", s)),
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect assembly, trimming and decontamination stats and write the report
    Stats {
        /// Contig FASTA per sample
        #[arg(long = "samples", value_parser = parse_sample_path, num_args = 1.., required = true)]
        samples: Vec<SamplePath>,

        /// Protein FASTA per sample
        #[arg(long = "proteins", value_parser = parse_sample_path, num_args = 1..)]
        proteins: Vec<SamplePath>,

        /// Report directory (default: the configured report step directory)
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
    },

    /// Split an annotation count table into one file per level
    Tables {
        /// Tab-delimited table with Level, Id, Name and Count columns
        #[arg(long)]
        table: PathBuf,

        /// Output prefix; files are <prefix>_level-<n>.tsv and <prefix>_level-id.tsv
        #[arg(long)]
        prefix: PathBuf,
    },

    /// Write annotated GFF, GTF and GenBank files for called features
    Annotate {
        /// Feature table (GFF)
        #[arg(long)]
        gff: PathBuf,
        /// Per-feature annotation summary
        #[arg(long)]
        summary: PathBuf,
        /// Contig FASTA
        #[arg(long)]
        fasta: PathBuf,
        /// Protein FASTA of the called features
        #[arg(long)]
        amino: PathBuf,
        /// Annotated GFF; the GTF is written beside it
        #[arg(long = "out-gff")]
        out_gff: PathBuf,
        /// GenBank output
        #[arg(long = "out-genbank")]
        out_genbank: PathBuf,
    },

    /// Write the default configuration file
    InitConfig {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}
