//! Re-opening circular contigs at an origin sequence.
//!
//! Trimmed contigs are aligned (as reference) against one or more origin
//! sequences such as dnaA (as query). The first qualifying hit fixes both the
//! strand the contig should be written on and the residue it should start at.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::circularise::config::CircularisationConfig;
use crate::circularise::{select_alignment, CirculariseError};
use crate::core::alignment::{AlignmentRecord, Strand};
use crate::core::contig::{Contig, ContigSet};
use crate::core::sequence::{reverse_complement, rotate};
use crate::utils::validation::length_to_f64;

/// Where and how a contig was re-opened
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OriginHit {
    /// Name of the origin sequence that matched
    pub origin: String,
    pub strand: Strand,
    /// Interbase offset, in the written orientation, that became position 0
    pub breakpoint: usize,
    pub percent_identity: f64,
}

/// A circularisable contig after orientation
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedContig {
    /// Rotated (and possibly reverse complemented) contig, original name kept
    pub contig: Contig,
    /// `None` when no origin hit qualified
    pub origin: Option<OriginHit>,
}

/// Compute the rotation for one contig from its accepted origin alignment.
///
/// On the same strand the breakpoint is the hit's reference start. On the
/// opposite strand the sequence is reverse complemented first and the
/// breakpoint is `reference_length - reference_start - 1`.
///
/// # Errors
///
/// Returns `CirculariseError::BreakpointOutOfRange` if the breakpoint falls
/// outside the sequence.
pub fn orient_sequence(
    name: &str,
    sequence: &[u8],
    alignment: &AlignmentRecord,
) -> Result<(Vec<u8>, usize), CirculariseError> {
    let out_of_range = |breakpoint: usize| CirculariseError::BreakpointOutOfRange {
        contig: name.to_string(),
        breakpoint,
        length: sequence.len(),
    };

    match alignment.strand() {
        Strand::Same => {
            let breakpoint = alignment.reference_start;
            let rotated = rotate(sequence, breakpoint).ok_or_else(|| out_of_range(breakpoint))?;
            Ok((rotated, breakpoint))
        }
        Strand::Opposite => {
            let breakpoint = alignment
                .reference_length
                .checked_sub(alignment.reference_start + 1)
                .ok_or_else(|| out_of_range(alignment.reference_start))?;
            let flipped = reverse_complement(sequence);
            let rotated = rotate(&flipped, breakpoint).ok_or_else(|| out_of_range(breakpoint))?;
            Ok((rotated, breakpoint))
        }
    }
}

/// Assigns origins to trimmed contigs
pub struct OrientationResolver<'a> {
    config: &'a CircularisationConfig,
}

impl<'a> OrientationResolver<'a> {
    pub fn new(config: &'a CircularisationConfig) -> Self {
        Self { config }
    }

    /// Whether an alignment against an origin sequence is strong enough
    #[must_use]
    pub fn qualifies(&self, alignment: &AlignmentRecord) -> bool {
        length_to_f64(alignment.hit_length_reference)
            > self.config.origin_hit_length_fraction * length_to_f64(alignment.query_length)
            && alignment.percent_identity > self.config.origin_hit_percent_identity
    }

    /// Pick the origin alignment for one contig, if any qualifies
    pub fn find_origin_hit<'r, I>(&self, contig: &Contig, alignments: I) -> Option<&'r AlignmentRecord>
    where
        I: IntoIterator<Item = &'r AlignmentRecord>,
    {
        let candidates = alignments
            .into_iter()
            .filter(|a| a.reference_name == contig.name)
            .filter(|a| self.qualifies(a));
        select_alignment(self.config.selection, candidates)
    }

    /// Orient every named contig, returning them in the order of `names`.
    ///
    /// # Errors
    ///
    /// Returns `CirculariseError::MissingContig` if a name is not in
    /// `contigs`, or the errors of [`orient_sequence`].
    pub fn resolve<S: AsRef<str>>(
        &self,
        contigs: &ContigSet,
        names: &[S],
        alignments: &[AlignmentRecord],
    ) -> Result<Vec<OrientedContig>, CirculariseError> {
        let mut by_contig: HashMap<&str, Vec<&AlignmentRecord>> = HashMap::new();
        for alignment in alignments {
            by_contig
                .entry(alignment.reference_name.as_str())
                .or_default()
                .push(alignment);
        }

        let mut oriented = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let contig = contigs
                .get(name)
                .ok_or_else(|| CirculariseError::MissingContig(name.to_string()))?;

            let hit = by_contig
                .get(name)
                .and_then(|hits| self.find_origin_hit(contig, hits.iter().copied()));

            let Some(alignment) = hit else {
                debug!("{name}: no qualifying origin hit");
                oriented.push(OrientedContig {
                    contig: contig.clone(),
                    origin: None,
                });
                continue;
            };

            let (sequence, breakpoint) = orient_sequence(name, &contig.sequence, alignment)?;
            debug!(
                "{name}: origin {} on {} strand, breakpoint {breakpoint}",
                alignment.query_name,
                alignment.strand()
            );
            oriented.push(OrientedContig {
                contig: contig.with_sequence(sequence),
                origin: Some(OriginHit {
                    origin: alignment.query_name.clone(),
                    strand: alignment.strand(),
                    breakpoint,
                    percent_identity: alignment.percent_identity,
                }),
            });
        }

        Ok(oriented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::tests::record;

    #[test]
    fn test_same_strand_rotation() {
        let sequence = b"AAAACCCCGGGGTTTT";
        let hit = record("ctg", "dnaA", (4, 7), (0, 3), 16, 4, 100.0);

        let (rotated, breakpoint) = orient_sequence("ctg", sequence, &hit).unwrap();
        assert_eq!(breakpoint, 4);
        assert_eq!(rotated, b"CCCCGGGGTTTTAAAA");
    }

    #[test]
    fn test_opposite_strand_rotation() {
        let sequence = b"AAAACCCCGGGGTTTt";
        let hit = record("ctg", "dnaA", (4, 7), (3, 0), 16, 4, 100.0);

        let (rotated, breakpoint) = orient_sequence("ctg", sequence, &hit).unwrap();
        // 16 - 4 - 1
        assert_eq!(breakpoint, 11);
        let flipped = reverse_complement(sequence);
        assert_eq!(flipped, b"aAAACCCCGGGGTTTT");
        assert_eq!(rotated, b"GTTTTaAAACCCCGGG");
        assert_eq!(rotated.len(), sequence.len());
    }

    #[test]
    fn test_breakpoint_out_of_range() {
        let hit = record("ctg", "dnaA", (20, 23), (0, 3), 24, 4, 100.0);
        assert!(matches!(
            orient_sequence("ctg", b"ACGT", &hit),
            Err(CirculariseError::BreakpointOutOfRange { breakpoint: 20, .. })
        ));

        let reverse = record("ctg", "dnaA", (30, 33), (3, 0), 24, 4, 100.0);
        assert!(orient_sequence("ctg", b"ACGT", &reverse).is_err());
    }

    #[test]
    fn test_origin_qualification() {
        let config = CircularisationConfig::default();
        let resolver = OrientationResolver::new(&config);

        // 96 of 100 origin bases at 90% identity
        assert!(resolver.qualifies(&record("c", "dnaA", (0, 95), (0, 95), 1000, 100, 90.0)));
        // 95 of 100 is not strictly above the fraction
        assert!(!resolver.qualifies(&record("c", "dnaA", (0, 94), (0, 94), 1000, 100, 90.0)));
        // Identity not above threshold
        assert!(!resolver.qualifies(&record("c", "dnaA", (0, 99), (0, 99), 1000, 100, 80.0)));
    }

    #[test]
    fn test_resolve_mixes_chromosomes_and_plasmids() {
        let config = CircularisationConfig::default();
        let resolver = OrientationResolver::new(&config);

        let contigs: ContigSet = vec![
            Contig::new("c1", "AAAACCCCGGGGTTTT"),
            Contig::new("c2", "ACGTACGTACGT"),
            Contig::new("c3", "AAAACCCCGGGGTTTt"),
        ]
        .into_iter()
        .collect();

        let alignments = vec![
            // Too weak, skipped
            record("c1", "dnaA", (0, 1), (0, 1), 16, 4, 100.0),
            record("c1", "dnaA", (8, 11), (0, 3), 16, 4, 99.0),
            // Second qualifying hit is ignored
            record("c1", "refA", (4, 7), (0, 3), 16, 4, 100.0),
            // Origin on the opposite strand
            record("c3", "dnaA", (4, 7), (3, 0), 16, 4, 100.0),
        ];

        let oriented = resolver
            .resolve(&contigs, &["c1", "c2", "c3"], &alignments)
            .unwrap();
        assert_eq!(oriented.len(), 3);

        assert_eq!(oriented[0].contig.name, "c1");
        assert_eq!(oriented[0].contig.sequence, b"GGGGTTTTAAAACCCC");
        let hit = oriented[0].origin.as_ref().unwrap();
        assert_eq!(hit.origin, "dnaA");
        assert_eq!(hit.breakpoint, 8);
        assert_eq!(hit.strand, Strand::Same);

        assert_eq!(oriented[1].contig, *contigs.get("c2").unwrap());
        assert!(oriented[1].origin.is_none());

        assert_eq!(oriented[2].contig.name, "c3");
        assert_eq!(oriented[2].contig.sequence, b"GTTTTaAAACCCCGGG");
        let hit = oriented[2].origin.as_ref().unwrap();
        assert_eq!(hit.strand, Strand::Opposite);
        assert_eq!(hit.breakpoint, 11);
    }

    #[test]
    fn test_resolve_unknown_contig() {
        let config = CircularisationConfig::default();
        let resolver = OrientationResolver::new(&config);
        let contigs = ContigSet::new();
        assert!(matches!(
            resolver.resolve(&contigs, &["missing"], &[]),
            Err(CirculariseError::MissingContig(_))
        ));
    }
}
