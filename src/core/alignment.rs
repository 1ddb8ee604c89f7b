use serde::{Deserialize, Serialize};

/// Relative orientation of the two aligned ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strand {
    /// Reference and query are collinear
    #[default]
    Same,
    /// The query aligns to the reverse complement of the reference
    Opposite,
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Same => write!(f, "+"),
            Self::Opposite => write!(f, "-"),
        }
    }
}

/// A single pairwise alignment between a reference range and a query range.
///
/// Coordinates are 0-based with inclusive ends. On the opposite strand the
/// query coordinates run backwards (`query_start > query_end`), matching the
/// way MUMmer reports reverse hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    pub reference_name: String,
    pub query_name: String,
    pub reference_start: usize,
    pub reference_end: usize,
    pub query_start: usize,
    pub query_end: usize,
    /// Full length of the reference sequence
    pub reference_length: usize,
    /// Full length of the query sequence
    pub query_length: usize,
    /// Number of reference bases covered by the hit
    pub hit_length_reference: usize,
    /// Number of query bases covered by the hit
    pub hit_length_query: usize,
    /// Percent identity, 0-100
    pub percent_identity: f64,
}

impl AlignmentRecord {
    /// Strand relation derived from the direction of the two coordinate pairs
    #[must_use]
    pub fn strand(&self) -> Strand {
        let reference_forward = self.reference_start <= self.reference_end;
        let query_forward = self.query_start <= self.query_end;
        if reference_forward == query_forward {
            Strand::Same
        } else {
            Strand::Opposite
        }
    }

    #[must_use]
    pub fn on_same_strand(&self) -> bool {
        self.strand() == Strand::Same
    }

    /// True for the trivial diagonal hit of a sequence against itself
    #[must_use]
    pub fn is_self_hit(&self) -> bool {
        self.reference_name == self.query_name
            && self.reference_start == self.query_start
            && self.reference_end == self.query_end
            && (self.percent_identity - 100.0).abs() < f64::EPSILON
    }

    /// True if both sides of the alignment lie on the named sequence
    #[must_use]
    pub fn is_within(&self, name: &str) -> bool {
        self.reference_name == name && self.query_name == name
    }
}
