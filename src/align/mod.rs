//! Pairwise alignment collaborators.
//!
//! Circularisation never aligns sequences itself. It asks an [`Aligner`] to
//! align a query FASTA against a reference FASTA and reads back
//! [`AlignmentRecord`]s. Two implementations are provided:
//!
//! - [`nucmer::Nucmer`]: runs MUMmer (`nucmer`, `delta-filter`, `show-coords`)
//! - [`precomputed::PrecomputedAlignments`]: reads an existing coords file
//!
//! Calls block until the aligner finishes. There is no timeout and no retry;
//! any failure is returned to the caller.

use std::path::Path;
use std::process::ExitStatus;

use thiserror::Error;

use crate::core::alignment::AlignmentRecord;
use crate::parsing::ParseError;

pub mod nucmer;
pub mod precomputed;

#[derive(Error, Debug)]
pub enum AlignError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read alignments: {0}")]
    Parse(#[from] ParseError),
}

/// Something that can align two FASTA files
pub trait Aligner {
    /// Align every sequence in `query` against every sequence in `reference`.
    ///
    /// Records name the `reference` sequence as reference and the `query`
    /// sequence as query. The raw coordinates are also written to `output`.
    /// Hits below `min_percent_identity` may be dropped by the aligner.
    ///
    /// # Errors
    ///
    /// Returns an `AlignError` if the aligner cannot run or its output cannot be read.
    fn align(
        &self,
        query: &Path,
        reference: &Path,
        output: &Path,
        min_percent_identity: f64,
    ) -> Result<Vec<AlignmentRecord>, AlignError>;
}
