//! Readers and writers for the files the pipeline exchanges with the outside world.
//!
//! - **FASTA** (plain or gzip): contigs and origin sequences, read and written with noodles
//! - **MUMmer coords**: tab-delimited `show-coords -dTlro` output, parsed into
//!   [`AlignmentRecord`](crate::core::alignment::AlignmentRecord)s
//!
//! ## Example
//!
//! ```rust,no_run
//! use contig_circulariser::parsing::{coords, fasta};
//! use std::path::Path;
//!
//! let contigs = fasta::read_contigs(Path::new("assembly.fa")).unwrap();
//! let alignments = coords::parse_coords_file(Path::new("self.coords")).unwrap();
//! ```

use thiserror::Error;

pub mod coords;
pub mod fasta;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Duplicate contig name: {0}")]
    DuplicateContig(String),

    #[error("Too many records: {0} exceeds maximum allowed")]
    TooManyRecords(usize),
}
