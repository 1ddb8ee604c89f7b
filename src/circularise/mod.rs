//! Circularisation of assembly contigs.
//!
//! The pipeline runs four steps over a contig collection:
//!
//! 1. [`overlap::OverlapDetector`] finds a self-alignment showing the contig's
//!    start repeated at its end
//! 2. [`overlap::trim_contigs`] cuts the duplicated ends off
//! 3. [`orientation::OrientationResolver`] aligns trimmed contigs to origin
//!    sequences and rotates each so the origin is at position 0
//! 4. [`naming::assign_names`] names contigs `chromosome{n}` (origin found) or
//!    `plasmid{n}` (no origin)
//!
//! [`pipeline::Pipeline`] wires these to the aligner and FASTA I/O.
//!
//! ## Example
//!
//! ```rust,no_run
//! use contig_circulariser::align::nucmer::Nucmer;
//! use contig_circulariser::circularise::config::CircularisationConfig;
//! use contig_circulariser::circularise::pipeline::{Pipeline, PipelineOptions};
//!
//! let options = PipelineOptions::new("assembly.fa", "dnaA.fa", "work");
//! let aligner = Nucmer::default();
//! let summary = Pipeline::new(CircularisationConfig::default(), options, &aligner)
//!     .unwrap()
//!     .run()
//!     .unwrap();
//! println!("wrote {}", summary.output.display());
//! ```

use thiserror::Error;

use crate::core::alignment::AlignmentRecord;

pub mod config;
pub mod naming;
pub mod orientation;
pub mod overlap;
pub mod pipeline;

pub use config::SelectionPolicy;

#[derive(Error, Debug)]
pub enum CirculariseError {
    #[error("Cannot trim {contig}: range {start}..{end} is outside a sequence of length {length}")]
    TrimOutOfRange {
        contig: String,
        start: usize,
        end: usize,
        length: usize,
    },

    #[error("Cannot rotate {contig}: breakpoint {breakpoint} is outside a sequence of length {length}")]
    BreakpointOutOfRange {
        contig: String,
        breakpoint: usize,
        length: usize,
    },

    #[error("Contig not found: {0}")]
    MissingContig(String),

    #[error("Contig {0} appears more than once")]
    DuplicateContig(String),
}

/// Choose one alignment from already-qualified candidates.
///
/// `Best` keeps the longest reference hit, then the highest identity; earlier
/// candidates win exact ties.
pub(crate) fn select_alignment<'r, I>(
    policy: SelectionPolicy,
    candidates: I,
) -> Option<&'r AlignmentRecord>
where
    I: IntoIterator<Item = &'r AlignmentRecord>,
{
    let mut candidates = candidates.into_iter();
    match policy {
        SelectionPolicy::First => candidates.next(),
        SelectionPolicy::Best => candidates.fold(None, |best, candidate| match best {
            Some(current) if !is_better(candidate, current) => Some(current),
            _ => Some(candidate),
        }),
    }
}

fn is_better(candidate: &AlignmentRecord, current: &AlignmentRecord) -> bool {
    candidate.hit_length_reference > current.hit_length_reference
        || (candidate.hit_length_reference == current.hit_length_reference
            && candidate.percent_identity > current.percent_identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::tests::record;

    #[test]
    fn test_select_first() {
        let a = record("c", "c", (0, 99), (900, 999), 1000, 1000, 90.0);
        let b = record("c", "c", (0, 199), (800, 999), 1000, 1000, 99.0);
        assert_eq!(select_alignment(SelectionPolicy::First, [&a, &b]), Some(&a));
        assert_eq!(select_alignment(SelectionPolicy::First, []), None);
    }

    #[test]
    fn test_select_best_breaks_ties_by_identity_then_order() {
        let a = record("c", "c", (0, 99), (900, 999), 1000, 1000, 90.0);
        let b = record("c", "c", (1, 100), (900, 999), 1000, 1000, 95.0);
        let c = record("c", "c", (2, 101), (900, 999), 1000, 1000, 95.0);
        assert_eq!(
            select_alignment(SelectionPolicy::Best, [&a, &b, &c]),
            Some(&b)
        );
    }
}
