//! Core data types for contig circularisation.
//!
//! - [`Contig`](contig::Contig) and [`ContigSet`](contig::ContigSet): named sequences, unique within a run
//! - [`AlignmentRecord`](alignment::AlignmentRecord): one pairwise hit as reported by the aligner
//! - [`sequence`]: reverse complement and rotation of circular sequences
//! - [`Classification`](types::Classification): chromosome, plasmid or linear
//!
//! ## Coordinates
//!
//! Alignment coordinates are 0-based with inclusive ends, the convention the
//! MUMmer coords parser produces after shifting from 1-based input. Rotation
//! breakpoints are interbase: a breakpoint `b` is the gap before residue `b`.

pub mod alignment;
pub mod contig;
pub mod sequence;
pub mod types;
