use clap::Parser;
use metareport_tools::annotation::{FeatureInputs, FeatureOutputs};
use metareport_tools::cli::{self, Commands};
use metareport_tools::commands;

fn main() {
    let args = cli::Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(log_level))
        .with_writer(std::io::stderr)
        .init();

    let result = match args.command {
        Commands::Stats {
            samples,
            proteins,
            out,
        } => commands::load_config(args.config.as_deref()).and_then(|config| {
            commands::stats::run(
                &config,
                commands::stats::StatsOptions {
                    samples,
                    proteins,
                    out,
                    verbose: args.verbose,
                },
            )
        }),
        Commands::Tables { table, prefix } => commands::tables::run(&table, &prefix),
        Commands::Annotate {
            gff,
            summary,
            fasta,
            amino,
            out_gff,
            out_genbank,
        } => commands::annotate::run(
            FeatureInputs {
                gff,
                summary,
                fasta,
                amino,
            },
            FeatureOutputs::new(out_gff, out_genbank),
        ),
        Commands::InitConfig { force } => {
            commands::init_config::run(args.config.as_deref(), force)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
