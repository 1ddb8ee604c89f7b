use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::validation::{is_valid_fraction, is_valid_percent};

/// Default start window for an overlap, as a fraction of contig length
pub const DEFAULT_OVERLAP_OFFSET_FRACTION: f64 = 0.49;
/// Default midpoint boundary an overlap must straddle, as a fraction of contig length
pub const DEFAULT_OVERLAP_BOUNDARY_FRACTION: f64 = 0.50;
/// Default minimum overlap length in bases
pub const DEFAULT_OVERLAP_MIN_LENGTH: usize = 2000;
/// Default minimum percent identity between the overlapping ends
pub const DEFAULT_OVERLAP_PERCENT_IDENTITY: f64 = 85.0;
/// Default minimum percent identity of an origin hit
pub const DEFAULT_ORIGIN_HIT_PERCENT_IDENTITY: f64 = 80.0;
/// Default minimum origin hit length, as a fraction of the origin sequence length
pub const DEFAULT_ORIGIN_HIT_LENGTH_FRACTION: f64 = 0.95;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a fraction between 0 and 1, got {value}")]
    InvalidFraction { name: &'static str, value: f64 },

    #[error("{name} must be a percentage between 0 and 100, got {value}")]
    InvalidPercent { name: &'static str, value: f64 },

    #[error("overlap offset fraction ({offset}) must not exceed overlap boundary fraction ({boundary})")]
    OffsetExceedsBoundary { offset: f64, boundary: f64 },
}

/// How to choose among several alignments that all qualify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// The first qualifying alignment in aligner output order
    #[default]
    First,
    /// The qualifying alignment with the longest reference hit, then highest identity
    Best,
}

/// Thresholds controlling overlap detection and origin assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularisationConfig {
    /// An overlap must start within this fraction of the contig start
    pub overlap_offset_fraction: f64,
    /// The overlap must straddle this fraction of the contig length
    pub overlap_boundary_fraction: f64,
    /// Reference hit length must exceed this
    pub overlap_min_length: usize,
    /// Percent identity between the two ends must exceed this
    pub overlap_percent_identity: f64,
    /// Percent identity of an origin hit must exceed this
    pub origin_hit_percent_identity: f64,
    /// Origin hit length must exceed this fraction of the origin length
    pub origin_hit_length_fraction: f64,
    /// Tie-break among qualifying alignments
    pub selection: SelectionPolicy,
    /// Write contigs without a terminal overlap to the output under their original names
    pub keep_linear: bool,
}

impl Default for CircularisationConfig {
    fn default() -> Self {
        Self {
            overlap_offset_fraction: DEFAULT_OVERLAP_OFFSET_FRACTION,
            overlap_boundary_fraction: DEFAULT_OVERLAP_BOUNDARY_FRACTION,
            overlap_min_length: DEFAULT_OVERLAP_MIN_LENGTH,
            overlap_percent_identity: DEFAULT_OVERLAP_PERCENT_IDENTITY,
            origin_hit_percent_identity: DEFAULT_ORIGIN_HIT_PERCENT_IDENTITY,
            origin_hit_length_fraction: DEFAULT_ORIGIN_HIT_LENGTH_FRACTION,
            selection: SelectionPolicy::default(),
            keep_linear: false,
        }
    }
}

impl CircularisationConfig {
    /// Check every threshold is in range and the overlap window is well formed.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("overlap offset fraction", self.overlap_offset_fraction),
            ("overlap boundary fraction", self.overlap_boundary_fraction),
            ("origin hit length fraction", self.origin_hit_length_fraction),
        ] {
            if !is_valid_fraction(value) {
                return Err(ConfigError::InvalidFraction { name, value });
            }
        }

        for (name, value) in [
            ("overlap percent identity", self.overlap_percent_identity),
            ("origin hit percent identity", self.origin_hit_percent_identity),
        ] {
            if !is_valid_percent(value) {
                return Err(ConfigError::InvalidPercent { name, value });
            }
        }

        if self.overlap_offset_fraction > self.overlap_boundary_fraction {
            return Err(ConfigError::OffsetExceedsBoundary {
                offset: self.overlap_offset_fraction,
                boundary: self.overlap_boundary_fraction,
            });
        }

        Ok(())
    }
}
