//! Parser for MUMmer `show-coords -dTlro` output.
//!
//! Each alignment is one tab-delimited line:
//!
//! | Field | Content |
//! |-------|---------|
//! | 0-3   | `S1 E1 S2 E2`: reference and query start/end (1-based, inclusive) |
//! | 4-5   | hit length on reference and on query |
//! | 6     | percent identity |
//! | 7-8   | reference and query sequence lengths |
//! | 9-10  | reading frames (direction) |
//! | 11-12 | reference and query names |
//! | 13    | optional overlap annotation (`-o`) |
//!
//! Without `-H`, `show-coords` prints a short preamble ending in a `[S1]` column
//! header; everything up to and including that line is skipped.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::alignment::{AlignmentRecord, Strand};
use crate::parsing::ParseError;
use crate::utils::validation::check_alignment_limit;

/// Number of fields in a coords line without the overlap annotation
const MIN_FIELDS: usize = 13;
/// Number of fields in a coords line with the overlap annotation
const MAX_FIELDS: usize = 14;

/// Parse a coords file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or the errors of
/// [`parse_coords_text`].
pub fn parse_coords_file(path: &Path) -> Result<Vec<AlignmentRecord>, ParseError> {
    let text = std::fs::read_to_string(path)?;
    parse_coords_text(&text)
}

/// Parse coords text into alignment records, in file order.
///
/// An empty file is valid and yields no records.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a line has the wrong number of
/// fields or a non-numeric coordinate, or `ParseError::TooManyRecords` if the
/// alignment limit is exceeded.
pub fn parse_coords_text(text: &str) -> Result<Vec<AlignmentRecord>, ParseError> {
    let body_start = text
        .lines()
        .position(|line| line.trim_start().starts_with("[S1]"))
        .map_or(0, |i| i + 1);

    let mut records = Vec::new();

    for (line_number, line) in text.lines().enumerate().skip(body_start) {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if check_alignment_limit(records.len()).is_some() {
            return Err(ParseError::TooManyRecords(records.len()));
        }

        records.push(parse_coords_line(line, line_number + 1)?);
    }

    Ok(records)
}

fn parse_coords_line(line: &str, line_number: usize) -> Result<AlignmentRecord, ParseError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if !(MIN_FIELDS..=MAX_FIELDS).contains(&fields.len()) {
        return Err(ParseError::InvalidFormat(format!(
            "coords line {line_number} has {} fields, expected {MIN_FIELDS} or {MAX_FIELDS}",
            fields.len()
        )));
    }

    let integer = |index: usize, what: &str| -> Result<usize, ParseError> {
        fields[index].trim().parse::<usize>().map_err(|_| {
            ParseError::InvalidFormat(format!(
                "coords line {line_number}: invalid {what}: {}",
                fields[index]
            ))
        })
    };
    // Coordinates are 1-based in the file
    let coordinate = |index: usize, what: &str| -> Result<usize, ParseError> {
        let value = integer(index, what)?;
        value.checked_sub(1).ok_or_else(|| {
            ParseError::InvalidFormat(format!(
                "coords line {line_number}: {what} must be at least 1"
            ))
        })
    };

    let percent_identity: f64 = fields[6].trim().parse().map_err(|_| {
        ParseError::InvalidFormat(format!(
            "coords line {line_number}: invalid percent identity: {}",
            fields[6]
        ))
    })?;

    Ok(AlignmentRecord {
        reference_start: coordinate(0, "reference start")?,
        reference_end: coordinate(1, "reference end")?,
        query_start: coordinate(2, "query start")?,
        query_end: coordinate(3, "query end")?,
        hit_length_reference: integer(4, "reference hit length")?,
        hit_length_query: integer(5, "query hit length")?,
        percent_identity,
        reference_length: integer(7, "reference length")?,
        query_length: integer(8, "query length")?,
        reference_name: fields[11].trim().to_string(),
        query_name: fields[12].trim().to_string(),
    })
}

/// Render a record back into a `show-coords -dTlro -H` line
#[must_use]
pub fn format_coords_line(record: &AlignmentRecord) -> String {
    let frame = match record.strand() {
        Strand::Same => "1\t1",
        Strand::Opposite => "1\t-1",
    };
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{:.2}\t{}\t{}\t{frame}\t{}\t{}",
        record.reference_start + 1,
        record.reference_end + 1,
        record.query_start + 1,
        record.query_end + 1,
        record.hit_length_reference,
        record.hit_length_query,
        record.percent_identity,
        record.reference_length,
        record.query_length,
        record.reference_name,
        record.query_name,
    )
}

/// Write records as a headerless coords file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be written.
pub fn write_coords_file(path: &Path, records: &[AlignmentRecord]) -> Result<(), ParseError> {
    let mut writer = BufWriter::new(File::create(path)?);
    for record in records {
        writeln!(writer, "{}", format_coords_line(record))?;
    }
    writer.flush()?;
    Ok(())
}
