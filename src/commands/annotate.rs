use crate::annotation::{write_datafiles, FeatureInputs, FeatureOutputs};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};

pub fn run(inputs: FeatureInputs, outputs: FeatureOutputs) -> Result<()> {
    let progress = ProgressBarBuilder::new("Writing annotated feature files...")
        .with_tick()
        .build()?;

    let summary = write_datafiles(&inputs, &outputs)
        .with_context(|| format!("Failed to annotate features of {}", inputs.gff.display()))?;

    progress.finish_with_message(format!(
        "Annotated {} features on {} contigs",
        summary.features, summary.contigs
    ));
    println!("GFF:     {}", outputs.gff.display());
    println!("GTF:     {}", outputs.gtf.display());
    println!("GenBank: {}", outputs.genbank.display());
    Ok(())
}
