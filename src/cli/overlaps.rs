use std::path::PathBuf;

use clap::Args;

use crate::align::nucmer::Nucmer;
use crate::align::precomputed::PrecomputedAlignments;
use crate::align::Aligner;
use crate::circularise::overlap::{Overlap, OverlapDetector};
use crate::circularise::pipeline::{plain_fasta, without_self_hits, SELF_ALIGNMENTS_FILE};
use crate::cli::{OutputFormat, ThresholdArgs};
use crate::parsing::fasta::read_contigs;

#[derive(Args)]
pub struct OverlapsArgs {
    /// Assembly contigs (FASTA, optionally gzipped)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Existing show-coords output of the contigs against themselves
    #[arg(long)]
    pub self_coords: Option<PathBuf>,

    /// Directory holding nucmer, delta-filter and show-coords (default: PATH)
    #[arg(long)]
    pub mummer_dir: Option<PathBuf>,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

/// Execute overlaps subcommand
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the input cannot be read,
/// or the aligner fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: OverlapsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.thresholds.to_config(false);
    config.validate()?;

    let contigs = read_contigs(&args.input)?;
    if verbose {
        eprintln!(
            "Loaded {} contigs ({} bp) from {}",
            contigs.len(),
            contigs.total_length(),
            args.input.display()
        );
    }

    let nucmer = args
        .mummer_dir
        .as_deref()
        .map_or_else(Nucmer::default, Nucmer::in_dir);
    let precomputed = args.self_coords.as_ref().map(PrecomputedAlignments::new);
    let aligner: &dyn Aligner = match &precomputed {
        Some(precomputed) => precomputed,
        None => &nucmer,
    };

    let workspace = tempfile::tempdir()?;
    let contigs_path = plain_fasta(&args.input, &contigs, workspace.path(), "input_contigs.fa")?;
    let alignments = without_self_hits(aligner.align(
        &contigs_path,
        &contigs_path,
        &workspace.path().join(SELF_ALIGNMENTS_FILE),
        config.overlap_percent_identity,
    )?);

    let overlaps = OverlapDetector::new(&config).detect(&contigs, &alignments);

    if verbose {
        eprintln!(
            "{} of {} contigs have a terminal overlap",
            overlaps.len(),
            contigs.len()
        );
    }

    match format {
        OutputFormat::Text => print_text_overlaps(&overlaps),
        OutputFormat::Json => print_json_overlaps(&overlaps)?,
        OutputFormat::Tsv => print_tsv_overlaps(&overlaps),
    }

    Ok(())
}

fn print_text_overlaps(overlaps: &[Overlap]) {
    if overlaps.is_empty() {
        println!("No terminal overlaps found.");
        return;
    }

    for overlap in overlaps {
        let hit = &overlap.alignment;
        println!(
            "{}: {} bp, ends {}-{} and {}-{} overlap ({} bp, {:.2}% identity), trimmed length {} bp",
            overlap.contig,
            overlap.contig_length,
            hit.reference_start + 1,
            hit.reference_end + 1,
            hit.query_start + 1,
            hit.query_end + 1,
            hit.hit_length_reference,
            hit.percent_identity,
            overlap.trimmed_length()
        );
    }
}

fn print_json_overlaps(overlaps: &[Overlap]) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = overlaps
        .iter()
        .map(|o| {
            serde_json::json!({
                "contig": o.contig,
                "length": o.contig_length,
                "trimmed_length": o.trimmed_length(),
                "alignment": o.alignment,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_overlaps(overlaps: &[Overlap]) {
    println!(
        "contig\tlength\treference_start\treference_end\tquery_start\tquery_end\thit_length\tpercent_identity\ttrimmed_length"
    );
    for overlap in overlaps {
        let hit = &overlap.alignment;
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.2}\t{}",
            overlap.contig,
            overlap.contig_length,
            hit.reference_start,
            hit.reference_end,
            hit.query_start,
            hit.query_end,
            hit.hit_length_reference,
            hit.percent_identity,
            overlap.trimmed_length()
        );
    }
}
