//! Command-line interface for contig-circulariser.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **circularise**: Trim, orient and rename circular contigs in a FASTA file
//! - **overlaps**: Report the terminal overlaps found in a FASTA file
//!
//! ## Usage
//!
//! ```text
//! # Circularise with MUMmer on the PATH
//! contig-circulariser circularise assembly.fa --origin dnaA.fa --working-dir work
//!
//! # Use a specific MUMmer installation and keep intermediate files
//! contig-circulariser circularise assembly.fa --origin dnaA.fa --mummer-dir /opt/mummer/bin --debug
//!
//! # Reuse existing show-coords output instead of running nucmer
//! contig-circulariser circularise assembly.fa --origin dnaA.fa \
//!     --self-coords self.coords --origin-coords origin.coords
//!
//! # JSON summary for scripting
//! contig-circulariser --format json overlaps assembly.fa --self-coords self.coords
//! ```

use clap::{Args, Parser, Subcommand};

use crate::circularise::config::{
    CircularisationConfig, SelectionPolicy, DEFAULT_ORIGIN_HIT_LENGTH_FRACTION,
    DEFAULT_ORIGIN_HIT_PERCENT_IDENTITY, DEFAULT_OVERLAP_BOUNDARY_FRACTION,
    DEFAULT_OVERLAP_MIN_LENGTH, DEFAULT_OVERLAP_OFFSET_FRACTION, DEFAULT_OVERLAP_PERCENT_IDENTITY,
};

pub mod circularise;
pub mod overlaps;

#[derive(Parser)]
#[command(name = "contig-circulariser")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Trim, orient and rename circular contigs from a genome assembly")]
#[command(
    long_about = "contig-circulariser finds contigs whose ends overlap, trims the duplicated end, and re-opens each circular contig at an origin-of-replication sequence such as dnaA.\n\nContigs with an origin hit are renamed chromosome1, chromosome2, ...; the rest plasmid1, plasmid2, ...\nAlignments come from MUMmer (nucmer, delta-filter, show-coords) or from existing show-coords files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trim, orient and rename circular contigs
    Circularise(circularise::CirculariseArgs),

    /// Report terminal overlaps without writing sequences
    Overlaps(overlaps::OverlapsArgs),
}

/// Thresholds shared by every subcommand
#[derive(Args, Clone, Debug)]
pub struct ThresholdArgs {
    /// An overlap must start within this fraction of the contig start
    #[arg(long, default_value_t = DEFAULT_OVERLAP_OFFSET_FRACTION)]
    pub overlap_offset: f64,

    /// The overlap must straddle this fraction of the contig length
    #[arg(long, default_value_t = DEFAULT_OVERLAP_BOUNDARY_FRACTION)]
    pub overlap_boundary: f64,

    /// Minimum overlap length in bases (exclusive)
    #[arg(long, default_value_t = DEFAULT_OVERLAP_MIN_LENGTH)]
    pub overlap_min_length: usize,

    /// Minimum percent identity between the overlapping ends (exclusive)
    #[arg(long, default_value_t = DEFAULT_OVERLAP_PERCENT_IDENTITY)]
    pub overlap_identity: f64,

    /// Minimum percent identity of an origin hit (exclusive)
    #[arg(long, default_value_t = DEFAULT_ORIGIN_HIT_PERCENT_IDENTITY)]
    pub origin_identity: f64,

    /// Minimum origin hit length as a fraction of the origin length (exclusive)
    #[arg(long, default_value_t = DEFAULT_ORIGIN_HIT_LENGTH_FRACTION)]
    pub origin_length_fraction: f64,

    /// How to choose among several qualifying alignments
    #[arg(long, value_enum, default_value = "first")]
    pub selection: SelectionPolicy,
}

impl ThresholdArgs {
    /// Build a pipeline configuration from the command line
    #[must_use]
    pub fn to_config(&self, keep_linear: bool) -> CircularisationConfig {
        CircularisationConfig {
            overlap_offset_fraction: self.overlap_offset,
            overlap_boundary_fraction: self.overlap_boundary,
            overlap_min_length: self.overlap_min_length,
            overlap_percent_identity: self.overlap_identity,
            origin_hit_percent_identity: self.origin_identity,
            origin_hit_length_fraction: self.origin_length_fraction,
            selection: self.selection,
            keep_linear,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
