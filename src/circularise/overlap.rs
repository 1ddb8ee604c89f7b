//! Detection and removal of terminal duplications.
//!
//! A linearised circular contig often carries the same stretch of sequence at
//! both ends. Aligning the contig against itself then yields a hit whose
//! reference copy sits at the start and whose query copy sits at the end:
//!
//! ```text
//!  0        ref_end              query_start        L-1
//!  |=========|--------------------|==================|
//!   reference copy     unique       query copy
//! ```
//!
//! The detector picks one such hit per contig and the trimmer keeps
//! `(ref_end, query_start]`.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::circularise::config::CircularisationConfig;
use crate::circularise::{select_alignment, CirculariseError};
use crate::core::alignment::AlignmentRecord;
use crate::core::contig::{Contig, ContigSet};
use crate::utils::validation::length_to_f64;

/// An accepted terminal overlap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlap {
    pub contig: String,
    pub contig_length: usize,
    pub alignment: AlignmentRecord,
}

impl Overlap {
    /// Length the contig will have after trimming
    #[must_use]
    pub fn trimmed_length(&self) -> usize {
        (self.alignment.query_start + 1).saturating_sub(self.alignment.reference_end + 1)
    }
}

/// Finds qualifying self-alignments
pub struct OverlapDetector<'a> {
    config: &'a CircularisationConfig,
}

impl<'a> OverlapDetector<'a> {
    pub fn new(config: &'a CircularisationConfig) -> Self {
        Self { config }
    }

    /// Whether a self-alignment describes a terminal duplication of a contig
    /// of length `contig_length`.
    ///
    /// The query copy must start after the reference copy ends, so an accepted
    /// hit always leaves a non-empty range for [`trim_sequence`].
    #[must_use]
    pub fn qualifies(&self, contig_length: usize, alignment: &AlignmentRecord) -> bool {
        let length = length_to_f64(contig_length);
        let acceptable_offset = self.config.overlap_offset_fraction * length;
        let boundary = self.config.overlap_boundary_fraction * length;

        length_to_f64(alignment.reference_start) < acceptable_offset
            && length_to_f64(alignment.reference_end) < boundary
            && length_to_f64(alignment.query_end) > boundary
            && length_to_f64(alignment.query_start)
                > length_to_f64(alignment.query_length) - acceptable_offset
            && alignment.hit_length_reference > self.config.overlap_min_length
            && alignment.percent_identity > self.config.overlap_percent_identity
            && alignment.query_start > alignment.reference_end
    }

    /// Pick the overlap for one contig from its self-alignments, if any qualifies
    pub fn find_overlap<'r, I>(&self, contig: &Contig, alignments: I) -> Option<&'r AlignmentRecord>
    where
        I: IntoIterator<Item = &'r AlignmentRecord>,
    {
        let candidates = alignments
            .into_iter()
            .filter(|a| a.is_within(&contig.name))
            .filter(|a| self.qualifies(contig.len(), a));
        select_alignment(self.config.selection, candidates)
    }

    /// Scan every contig, returning accepted overlaps in contig order.
    ///
    /// Alignments whose reference and query name differ are ignored.
    #[must_use]
    pub fn detect(&self, contigs: &ContigSet, alignments: &[AlignmentRecord]) -> Vec<Overlap> {
        let mut by_contig: HashMap<&str, Vec<&AlignmentRecord>> = HashMap::new();
        for alignment in alignments {
            if alignment.reference_name == alignment.query_name {
                by_contig
                    .entry(alignment.reference_name.as_str())
                    .or_default()
                    .push(alignment);
            }
        }

        let mut overlaps = Vec::new();
        for contig in contigs {
            let Some(hits) = by_contig.get(contig.name.as_str()) else {
                continue;
            };
            match self.find_overlap(contig, hits.iter().copied()) {
                Some(alignment) => {
                    debug!(
                        "{}: overlap {}-{} / {}-{} ({:.2}% identity)",
                        contig.name,
                        alignment.reference_start,
                        alignment.reference_end,
                        alignment.query_start,
                        alignment.query_end,
                        alignment.percent_identity
                    );
                    overlaps.push(Overlap {
                        contig: contig.name.clone(),
                        contig_length: contig.len(),
                        alignment: alignment.clone(),
                    });
                }
                None => debug!("{}: no qualifying overlap", contig.name),
            }
        }
        overlaps
    }
}

/// Keep the single-copy region of a sequence: `sequence[ref_end + 1 .. query_start + 1]`.
///
/// # Errors
///
/// Returns `CirculariseError::TrimOutOfRange` if the range is inverted or runs
/// past the end of the sequence.
pub fn trim_sequence(
    name: &str,
    sequence: &[u8],
    alignment: &AlignmentRecord,
) -> Result<Vec<u8>, CirculariseError> {
    let start = alignment.reference_end + 1;
    let end = alignment.query_start + 1;
    if start > end || end > sequence.len() {
        return Err(CirculariseError::TrimOutOfRange {
            contig: name.to_string(),
            start,
            end,
            length: sequence.len(),
        });
    }
    Ok(sequence[start..end].to_vec())
}

/// Contigs after trimming, plus the names that were trimmed
#[derive(Debug, Clone)]
pub struct TrimmedContigs {
    /// Every input contig; trimmed where an overlap was accepted, untouched otherwise
    pub contigs: ContigSet,
    /// Names of the trimmed contigs, in input order
    pub circularisable: Vec<String>,
}

/// Apply accepted overlaps to a contig set, returning a new snapshot
///
/// # Errors
///
/// Returns `CirculariseError::MissingContig` if an overlap names an unknown
/// contig, `CirculariseError::DuplicateContig` if a name repeats, or the errors
/// of [`trim_sequence`].
pub fn trim_contigs(
    contigs: &ContigSet,
    overlaps: &[Overlap],
) -> Result<TrimmedContigs, CirculariseError> {
    let by_name: HashMap<&str, &Overlap> =
        overlaps.iter().map(|o| (o.contig.as_str(), o)).collect();

    for overlap in overlaps {
        if !contigs.contains(&overlap.contig) {
            return Err(CirculariseError::MissingContig(overlap.contig.clone()));
        }
    }

    let mut trimmed = ContigSet::new();
    let mut circularisable = Vec::new();
    for contig in contigs {
        let next = match by_name.get(contig.name.as_str()) {
            Some(overlap) => {
                circularisable.push(contig.name.clone());
                contig.with_sequence(trim_sequence(
                    &contig.name,
                    &contig.sequence,
                    &overlap.alignment,
                )?)
            }
            None => contig.clone(),
        };
        trimmed
            .insert(next)
            .map_err(|dup| CirculariseError::DuplicateContig(dup.name))?;
    }

    Ok(TrimmedContigs {
        contigs: trimmed,
        circularisable,
    })
}
