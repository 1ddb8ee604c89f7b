use std::path::{Path, PathBuf};

use tracing::info;

use crate::align::{AlignError, Aligner};
use crate::core::alignment::AlignmentRecord;
use crate::parsing::coords::{parse_coords_file, write_coords_file};

/// Serves alignments from an existing `show-coords` file instead of running an aligner.
///
/// The query and reference paths are ignored; the records are copied to the
/// requested output path so intermediate files look the same either way.
#[derive(Debug, Clone)]
pub struct PrecomputedAlignments {
    coords: PathBuf,
}

impl PrecomputedAlignments {
    pub fn new(coords: impl Into<PathBuf>) -> Self {
        Self {
            coords: coords.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.coords
    }
}

impl Aligner for PrecomputedAlignments {
    fn align(
        &self,
        _query: &Path,
        _reference: &Path,
        output: &Path,
        _min_percent_identity: f64,
    ) -> Result<Vec<AlignmentRecord>, AlignError> {
        let records = parse_coords_file(&self.coords)?;
        info!(
            "Read {} precomputed alignments from {}",
            records.len(),
            self.coords.display()
        );
        write_coords_file(output, &records)?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_and_copies_coords() {
        let mut coords = NamedTempFile::with_suffix(".coords").unwrap();
        writeln!(
            coords,
            "1\t2500\t7501\t10000\t2500\t2500\t99.00\t10000\t10000\t1\t1\tctg1\tctg1"
        )
        .unwrap();
        coords.flush().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("copy.coords");
        let aligner = PrecomputedAlignments::new(coords.path());
        let records = aligner
            .align(Path::new("q.fa"), Path::new("r.fa"), &output, 85.0)
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reference_name, "ctg1");
        assert_eq!(parse_coords_file(&output).unwrap(), records);
    }

    #[test]
    fn test_missing_coords_file() {
        let aligner = PrecomputedAlignments::new("/nonexistent/self.coords");
        let dir = tempfile::tempdir().unwrap();
        let result = aligner.align(
            Path::new("q.fa"),
            Path::new("r.fa"),
            &dir.path().join("out.coords"),
            85.0,
        );
        assert!(matches!(result, Err(AlignError::Parse(_))));
    }
}
