//! # contig-circulariser
//!
//! A library for circularising contigs from a genome assembly.
//!
//! Assemblers emit circular replicons (bacterial chromosomes, plasmids) as
//! linear contigs whose two ends usually repeat the same stretch of sequence.
//! `contig-circulariser` finds that repeat from a self-alignment, trims it off,
//! and re-opens each circular contig at a known origin-of-replication gene
//! such as dnaA so every chromosome starts at the same place.
//!
//! ## Features
//!
//! - **Overlap detection**: Recognises terminal duplications from self-alignments
//! - **Trimming**: Removes the duplicated end of each circular contig
//! - **Orientation**: Rotates and, if needed, reverse complements onto the origin
//! - **Naming**: Renames contigs `chromosome{n}` or `plasmid{n}`
//! - **Pluggable alignment**: Runs MUMmer or reads precomputed `show-coords` output
//!
//! ## Example
//!
//! ```rust,no_run
//! use contig_circulariser::align::precomputed::PrecomputedAlignments;
//! use contig_circulariser::{CircularisationConfig, Pipeline, PipelineOptions};
//!
//! let self_hits = PrecomputedAlignments::new("self.coords");
//! let origin_hits = PrecomputedAlignments::new("origin.coords");
//! let options = PipelineOptions::new("assembly.fa", "dnaA.fa", "work");
//!
//! let summary = Pipeline::new(CircularisationConfig::default(), options, &self_hits)
//!     .unwrap()
//!     .with_origin_aligner(&origin_hits)
//!     .run()
//!     .unwrap();
//!
//! for contig in &summary.contigs {
//!     println!("{} -> {:?}", contig.contig, contig.output_name);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`align`]: Aligner trait, MUMmer runner and precomputed alignments
//! - [`circularise`]: Overlap detection, trimming, orientation, naming and the pipeline
//! - [`core`]: Core data types for contigs and alignments
//! - [`parsing`]: FASTA and coords readers and writers
//! - [`cli`]: Command-line interface implementation

pub mod align;
pub mod circularise;
pub mod cli;
pub mod core;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use circularise::config::CircularisationConfig;
pub use circularise::pipeline::{Pipeline, PipelineError, PipelineOptions, RunSummary};
pub use core::alignment::{AlignmentRecord, Strand};
pub use core::contig::{Contig, ContigSet};
pub use core::types::*;
