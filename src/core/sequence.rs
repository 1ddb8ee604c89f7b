//! Operations on raw residue strings.

/// Complement a single base, preserving case. Anything that is not
/// A/C/G/T (N, IUPAC ambiguity codes, gaps) is returned unchanged.
#[inline]
#[must_use]
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'a' => b't',
        b't' => b'a',
        b'c' => b'g',
        b'g' => b'c',
        _ => base,
    }
}

/// Reverse complement a sequence
#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

/// Re-open a circular sequence so that `breakpoint` becomes position 0.
///
/// The result is `seq[breakpoint..] + seq[..breakpoint]`. Returns `None` if
/// the breakpoint lies beyond the end of the sequence. A breakpoint equal to
/// the length is the same cut as 0.
#[must_use]
pub fn rotate(seq: &[u8], breakpoint: usize) -> Option<Vec<u8>> {
    if breakpoint > seq.len() {
        return None;
    }
    let mut rotated = Vec::with_capacity(seq.len());
    rotated.extend_from_slice(&seq[breakpoint..]);
    rotated.extend_from_slice(&seq[..breakpoint]);
    Some(rotated)
}
