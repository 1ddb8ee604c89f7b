use std::path::PathBuf;

use clap::Args;

use crate::align::nucmer::Nucmer;
use crate::align::precomputed::PrecomputedAlignments;
use crate::align::Aligner;
use crate::circularise::pipeline::{ContigOutcome, Pipeline, PipelineOptions, RunSummary};
use crate::cli::{OutputFormat, ThresholdArgs};
use crate::core::types::Classification;

#[derive(Args)]
pub struct CirculariseArgs {
    /// Assembly contigs (FASTA, optionally gzipped)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Origin-of-replication sequences, e.g. dnaA (FASTA, optionally gzipped)
    #[arg(long, required = true)]
    pub origin: PathBuf,

    /// Directory for the output and intermediate files
    #[arg(short, long, default_value = ".")]
    pub working_dir: PathBuf,

    /// Output FASTA (default: circularised_<input name> in the working directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write contigs without a terminal overlap to the output unchanged
    #[arg(long)]
    pub keep_linear: bool,

    /// Keep intermediate files in the working directory
    #[arg(long)]
    pub debug: bool,

    /// Existing show-coords output of the contigs against themselves
    #[arg(long)]
    pub self_coords: Option<PathBuf>,

    /// Existing show-coords output of the trimmed contigs against the origin sequences
    #[arg(long)]
    pub origin_coords: Option<PathBuf>,

    /// Directory holding nucmer, delta-filter and show-coords (default: PATH)
    #[arg(long)]
    pub mummer_dir: Option<PathBuf>,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

/// Execute circularise subcommand
///
/// # Errors
///
/// Returns an error if the configuration is invalid, an input cannot be read,
/// the aligner fails, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CirculariseArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.thresholds.to_config(args.keep_linear);

    let nucmer = args
        .mummer_dir
        .as_deref()
        .map_or_else(Nucmer::default, Nucmer::in_dir);
    let self_coords = args.self_coords.as_ref().map(PrecomputedAlignments::new);
    let origin_coords = args.origin_coords.as_ref().map(PrecomputedAlignments::new);

    let self_aligner: &dyn Aligner = match &self_coords {
        Some(precomputed) => precomputed,
        None => &nucmer,
    };
    let origin_aligner: &dyn Aligner = match &origin_coords {
        Some(precomputed) => precomputed,
        None => &nucmer,
    };

    let mut options = PipelineOptions::new(&args.input, &args.origin, &args.working_dir)
        .with_debug(args.debug);
    if let Some(output) = &args.output {
        options = options.with_output(output);
    }

    if verbose {
        eprintln!(
            "Circularising {} against origins in {}",
            args.input.display(),
            args.origin.display()
        );
    }

    let summary = Pipeline::new(config, options, self_aligner)?
        .with_origin_aligner(origin_aligner)
        .run()?;

    match format {
        OutputFormat::Text => print_text_summary(&summary, verbose),
        OutputFormat::Json => print_json_summary(&summary)?,
        OutputFormat::Tsv => print_tsv_summary(&summary),
    }

    Ok(())
}

fn print_text_summary(summary: &RunSummary, verbose: bool) {
    println!("Input:  {}", summary.input.display());
    println!("Output: {}", summary.output.display());
    if let Some(dir) = &summary.intermediates {
        println!("Intermediate files: {}", dir.display());
    }
    println!();

    let linear = summary.count(Classification::Linear);
    println!(
        "{} chromosome(s), {} plasmid(s), {} linear contig(s) {}",
        summary.count(Classification::Chromosome),
        summary.count(Classification::Plasmid),
        linear,
        if summary.config.keep_linear {
            "kept"
        } else {
            "dropped"
        }
    );
    println!("{} contig(s) written", summary.written());

    if summary.contigs.is_empty() {
        return;
    }
    println!();

    for outcome in &summary.contigs {
        if outcome.classification == Classification::Linear && !verbose {
            continue;
        }
        println!("{}", describe(outcome));
    }
}

fn describe(outcome: &ContigOutcome) -> String {
    let target = outcome.output_name.as_deref().unwrap_or("(not written)");
    let mut line = format!(
        "  {} -> {target} [{}] {} bp",
        outcome.contig, outcome.classification, outcome.original_length
    );
    if let Some(trimmed) = outcome.trimmed_length {
        line.push_str(&format!(", trimmed to {trimmed} bp"));
    }
    if let Some(hit) = &outcome.origin {
        line.push_str(&format!(
            ", {} on {} strand at {} ({:.2}% identity)",
            hit.origin, hit.strand, hit.breakpoint, hit.percent_identity
        ));
    }
    line
}

fn print_json_summary(summary: &RunSummary) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn print_tsv_summary(summary: &RunSummary) {
    println!(
        "contig\toutput_name\tclassification\toriginal_length\ttrimmed_length\tfinal_length\torigin\tstrand\tbreakpoint\tpercent_identity"
    );
    for outcome in &summary.contigs {
        let (origin, strand, breakpoint, identity) = match &outcome.origin {
            Some(hit) => (
                hit.origin.clone(),
                hit.strand.to_string(),
                hit.breakpoint.to_string(),
                format!("{:.2}", hit.percent_identity),
            ),
            None => Default::default(),
        };
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            outcome.contig,
            outcome.output_name.as_deref().unwrap_or(""),
            outcome.classification,
            outcome.original_length,
            outcome
                .trimmed_length
                .map(|l| l.to_string())
                .unwrap_or_default(),
            outcome.final_length,
            origin,
            strand,
            breakpoint,
            identity,
        );
    }
}
