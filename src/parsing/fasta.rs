//! FASTA input and output using noodles.
//!
//! Contigs are read whole, since every stage of circularisation needs the
//! residues. Gzip-compressed input is detected from the file name.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.fna.gz` (gzip compressed)
//! - `.fa.bgz`, `.fasta.bgz`, `.fna.bgz` (bgzip compressed)

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;

use crate::core::contig::{Contig, ContigSet};
use crate::parsing::ParseError;
use crate::utils::validation::check_contig_limit;

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();

    if path_str.ends_with(".fa.gz")
        || path_str.ends_with(".fasta.gz")
        || path_str.ends_with(".fna.gz")
        || path_str.ends_with(".fa.bgz")
        || path_str.ends_with(".fasta.bgz")
        || path_str.ends_with(".fna.bgz")
    {
        return true;
    }

    matches!(
        path.extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "fna")
    )
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Read every record of a FASTA file into a [`ContigSet`].
///
/// The contig name is the first word of the definition line.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles` if
/// a record is malformed, `ParseError::DuplicateContig` if two records share a
/// name, `ParseError::InvalidFormat` if the file holds no records, or
/// `ParseError::TooManyRecords` if the contig limit is exceeded.
pub fn read_contigs(path: &Path) -> Result<ContigSet, ParseError> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        let mut reader = fasta::io::Reader::new(BufReader::new(MultiGzDecoder::new(file)));
        read_records(&mut reader)
    } else {
        let mut reader = fasta::io::Reader::new(BufReader::new(file));
        read_records(&mut reader)
    }
}

/// Parse FASTA records from in-memory text
///
/// # Errors
///
/// Same as [`read_contigs`], minus file access.
pub fn parse_fasta_text(text: &str) -> Result<ContigSet, ParseError> {
    let mut reader = fasta::io::Reader::new(text.as_bytes());
    read_records(&mut reader)
}

fn read_records<R: BufRead>(reader: &mut fasta::io::Reader<R>) -> Result<ContigSet, ParseError> {
    let mut contigs = ContigSet::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        if check_contig_limit(contigs.len()).is_some() {
            return Err(ParseError::TooManyRecords(contigs.len()));
        }

        let name = String::from_utf8_lossy(record.name()).to_string();
        let sequence = record.sequence().as_ref().to_vec();

        contigs
            .insert(Contig::new(name, sequence))
            .map_err(|dup| ParseError::DuplicateContig(dup.name))?;
    }

    if contigs.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in FASTA file".to_string(),
        ));
    }

    Ok(contigs)
}

/// Write contigs as FASTA to any writer
///
/// # Errors
///
/// Returns `ParseError::Io` if writing fails.
pub fn write_contigs_to<'a, W, I>(mut inner: W, contigs: I) -> Result<(), ParseError>
where
    W: Write,
    I: IntoIterator<Item = &'a Contig>,
{
    let mut writer = fasta::io::Writer::new(&mut inner);

    for contig in contigs {
        let definition = fasta::record::Definition::new(contig.name.as_str(), None);
        let sequence = fasta::record::Sequence::from(contig.sequence.clone());
        writer.write_record(&fasta::Record::new(definition, sequence))?;
    }

    drop(writer);
    inner.flush()?;
    Ok(())
}

/// Write contigs to a new FASTA file, replacing any existing file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be created or written.
pub fn write_contigs<'a, I>(path: &Path, contigs: I) -> Result<(), ParseError>
where
    I: IntoIterator<Item = &'a Contig>,
{
    let file = File::create(path)?;
    write_contigs_to(BufWriter::new(file), contigs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_is_fasta_file() {
        assert!(is_fasta_file(Path::new("test.fa")));
        assert!(is_fasta_file(Path::new("test.fasta")));
        assert!(is_fasta_file(Path::new("test.fna")));
        assert!(is_fasta_file(Path::new("test.fa.gz")));
        assert!(is_fasta_file(Path::new("test.fna.bgz")));
        assert!(is_fasta_file(Path::new("/path/to/Assembly.FA")));

        assert!(!is_fasta_file(Path::new("test.coords")));
        assert!(!is_fasta_file(Path::new("test.fai")));
    }

    #[test]
    fn test_read_contigs() {
        let fasta_content = b">ctg1 length=12\nACGTACGT\nACGT\n>ctg2\nggNN\n";

        let mut temp = NamedTempFile::with_suffix(".fa").unwrap();
        temp.write_all(fasta_content).unwrap();
        temp.flush().unwrap();

        let contigs = read_contigs(temp.path()).unwrap();
        assert_eq!(contigs.len(), 2);
        assert_eq!(contigs.get("ctg1").unwrap().sequence, b"ACGTACGTACGT");
        assert_eq!(contigs.get("ctg2").unwrap().sequence, b"ggNN");
        assert_eq!(contigs.names().collect::<Vec<_>>(), vec!["ctg1", "ctg2"]);
    }

    #[test]
    fn test_read_gzipped_contigs() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let temp = NamedTempFile::with_suffix(".fa.gz").unwrap();
        let mut encoder = GzEncoder::new(File::create(temp.path()).unwrap(), Compression::default());
        encoder.write_all(b">ctg1\nACGT\n").unwrap();
        encoder.finish().unwrap();

        let contigs = read_contigs(temp.path()).unwrap();
        assert_eq!(contigs.get("ctg1").unwrap().sequence, b"ACGT");
    }

    #[test]
    fn test_read_empty_fasta() {
        let mut temp = NamedTempFile::with_suffix(".fa").unwrap();
        temp.write_all(b"").unwrap();
        temp.flush().unwrap();

        assert!(matches!(
            read_contigs(temp.path()),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = parse_fasta_text(">a\nAC\n>a\nGT\n");
        assert!(matches!(result, Err(ParseError::DuplicateContig(name)) if name == "a"));
    }

    #[test]
    fn test_missing_file() {
        let result = read_contigs(Path::new("/nonexistent/contigs.fa"));
        assert!(matches!(result, Err(ParseError::Io(_))));
    }

    #[test]
    fn test_write_then_read_preserves_names_and_order() {
        let contigs = vec![
            Contig::new("plasmid1", "ACGTacgt"),
            Contig::new("chromosome1", "GGGGCCCCAAAATTTT"),
        ];

        let temp = NamedTempFile::with_suffix(".fa").unwrap();
        write_contigs(temp.path(), &contigs).unwrap();

        let read_back = read_contigs(temp.path()).unwrap();
        assert_eq!(
            read_back.names().collect::<Vec<_>>(),
            vec!["plasmid1", "chromosome1"]
        );
        assert_eq!(read_back.get("plasmid1").unwrap().sequence, b"ACGTacgt");
    }
}
