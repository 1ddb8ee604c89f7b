//! Centralized validation and helper functions.

/// Maximum number of contigs allowed in a single input file
pub const MAX_CONTIGS: usize = 100_000;

/// Maximum number of alignment records read from a single coords file
pub const MAX_ALIGNMENTS: usize = 10_000_000;

/// Check that a value is a fraction in `[0, 1]`.
///
/// # Examples
///
/// ```
/// use contig_circulariser::utils::validation::is_valid_fraction;
///
/// assert!(is_valid_fraction(0.49));
/// assert!(!is_valid_fraction(1.5));
/// assert!(!is_valid_fraction(f64::NAN));
/// ```
#[must_use]
pub fn is_valid_fraction(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Check that a value is a percentage in `[0, 100]`.
#[must_use]
pub fn is_valid_percent(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

/// Check if adding another contig would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new contig.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_contig_limit(count: usize) -> Option<String> {
    if count >= MAX_CONTIGS {
        Some(format!(
            "Too many contigs: adding another would exceed maximum of {MAX_CONTIGS}"
        ))
    } else {
        None
    }
}

/// Same as [`check_contig_limit`] for alignment records
#[must_use]
pub fn check_alignment_limit(count: usize) -> Option<String> {
    if count >= MAX_ALIGNMENTS {
        Some(format!(
            "Too many alignments: adding another would exceed maximum of {MAX_ALIGNMENTS}"
        ))
    } else {
        None
    }
}

/// Convert a length to `f64` for comparison against fractional thresholds
#[inline]
#[must_use]
pub fn length_to_f64(length: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)] // Sequence lengths are far below 2^52
    {
        length as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_fraction() {
        assert!(is_valid_fraction(0.0));
        assert!(is_valid_fraction(0.5));
        assert!(is_valid_fraction(1.0));
        assert!(!is_valid_fraction(-0.01));
        assert!(!is_valid_fraction(1.01));
        assert!(!is_valid_fraction(f64::NAN));
    }

    #[test]
    fn test_is_valid_percent() {
        assert!(is_valid_percent(0.0));
        assert!(is_valid_percent(85.0));
        assert!(is_valid_percent(100.0));
        assert!(!is_valid_percent(100.5));
        assert!(!is_valid_percent(-1.0));
    }

    #[test]
    fn test_check_contig_limit() {
        assert!(check_contig_limit(100).is_none());
        assert!(check_contig_limit(MAX_CONTIGS - 1).is_none());
        assert!(check_contig_limit(MAX_CONTIGS).is_some());
        assert!(check_contig_limit(MAX_CONTIGS + 1).is_some());
    }

    #[test]
    fn test_check_alignment_limit() {
        assert!(check_alignment_limit(0).is_none());
        assert!(check_alignment_limit(MAX_ALIGNMENTS).is_some());
    }
}
