//! End-to-end circularisation of a FASTA file.
//!
//! Every file the run touches is addressed by an explicit path; the process
//! working directory is never changed. Intermediate files go to a temporary
//! directory inside the working directory, or straight into the working
//! directory when debugging so they survive the run. The final FASTA is written
//! to a temporary file and renamed into place, so a failed run never leaves a
//! partial output behind.

use std::collections::{HashMap, HashSet};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::{NamedTempFile, TempDir};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::align::{AlignError, Aligner};
use crate::circularise::config::{CircularisationConfig, ConfigError};
use crate::circularise::naming::{assign_names, NameMap};
use crate::circularise::orientation::{OrientationResolver, OrientedContig, OriginHit};
use crate::circularise::overlap::{trim_contigs, OverlapDetector};
use crate::circularise::CirculariseError;
use crate::core::alignment::AlignmentRecord;
use crate::core::contig::{Contig, ContigSet};
use crate::core::types::Classification;
use crate::parsing::fasta::{
    is_fasta_file, is_gzipped, read_contigs, write_contigs, write_contigs_to,
};
use crate::parsing::ParseError;

/// Self-alignments of the input contigs
pub const SELF_ALIGNMENTS_FILE: &str = "nucmer_all_contigs.coords";
/// Alignments of trimmed contigs against the origin sequences
pub const ORIGIN_ALIGNMENTS_FILE: &str = "nucmer_matches_to_dnaA.coords";
/// All contigs after trimming
pub const TRIMMED_FILE: &str = "trimmed.fa";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read input: {0}")]
    Parse(#[from] ParseError),

    #[error("Alignment failed: {0}")]
    Align(#[from] AlignError),

    #[error(transparent)]
    Circularise(#[from] CirculariseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output name {0} is used by more than one contig")]
    NameCollision(String),
}

/// Where a run reads from and writes to
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Contigs to circularise
    pub input: PathBuf,
    /// One or more origin sequences (e.g. dnaA)
    pub origin: PathBuf,
    /// Directory for the output and intermediate files
    pub working_dir: PathBuf,
    /// Final FASTA; defaults to `circularised_<input name>` in the working directory
    pub output: Option<PathBuf>,
    /// Keep intermediate files in the working directory
    pub debug: bool,
}

impl PipelineOptions {
    pub fn new(
        input: impl Into<PathBuf>,
        origin: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input: input.into(),
            origin: origin.into(),
            working_dir: working_dir.into(),
            output: None,
            debug: false,
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Input file name with any compression suffix removed
    fn input_name(&self) -> String {
        let name = self
            .input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "contigs.fa".to_string());
        name.strip_suffix(".gz")
            .or_else(|| name.strip_suffix(".bgz"))
            .map_or_else(|| name.clone(), str::to_string)
    }

    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            self.working_dir
                .join(format!("circularised_{}", self.input_name()))
        })
    }

    fn unsorted_file_name(&self) -> String {
        format!("unsorted_circularised_{}", self.input_name())
    }
}

/// What happened to one input contig
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContigOutcome {
    pub contig: String,
    /// Name in the output file; `None` if the contig was not written
    pub output_name: Option<String>,
    pub classification: Classification,
    pub original_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trimmed_length: Option<usize>,
    pub final_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<OriginHit>,
}

/// Result of a pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Directory holding intermediate files, if they were kept
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intermediates: Option<PathBuf>,
    pub config: CircularisationConfig,
    /// One entry per input contig, in input order
    pub contigs: Vec<ContigOutcome>,
}

impl RunSummary {
    #[must_use]
    pub fn count(&self, classification: Classification) -> usize {
        self.contigs
            .iter()
            .filter(|c| c.classification == classification)
            .count()
    }

    #[must_use]
    pub fn written(&self) -> usize {
        self.contigs
            .iter()
            .filter(|c| c.output_name.is_some())
            .count()
    }
}

/// Directory holding one run's intermediate files
enum Workspace {
    Retained(PathBuf),
    Temporary(TempDir),
}

impl Workspace {
    fn create(working_dir: &Path, debug: bool) -> std::io::Result<Self> {
        if debug {
            Ok(Self::Retained(working_dir.to_path_buf()))
        } else {
            tempfile::Builder::new()
                .prefix(".circularise-")
                .tempdir_in(working_dir)
                .map(Self::Temporary)
        }
    }

    fn path(&self) -> &Path {
        match self {
            Self::Retained(path) => path,
            Self::Temporary(dir) => dir.path(),
        }
    }

    /// Remove temporary files, returning the directory if it was kept
    fn finish(self) -> Option<PathBuf> {
        match self {
            Self::Retained(path) => Some(path),
            Self::Temporary(dir) => {
                let path = dir.path().to_path_buf();
                if let Err(e) = dir.close() {
                    warn!("Failed to remove {}: {e}", path.display());
                }
                None
            }
        }
    }
}

/// Runs overlap detection, trimming, orientation and naming over a FASTA file
pub struct Pipeline<'a> {
    config: CircularisationConfig,
    options: PipelineOptions,
    self_aligner: &'a dyn Aligner,
    origin_aligner: &'a dyn Aligner,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline using `aligner` for both alignment steps
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Config` if the thresholds are inconsistent.
    pub fn new(
        config: CircularisationConfig,
        options: PipelineOptions,
        aligner: &'a dyn Aligner,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            options,
            self_aligner: aligner,
            origin_aligner: aligner,
        })
    }

    /// Use a different aligner for the origin step
    #[must_use]
    pub fn with_origin_aligner(mut self, aligner: &'a dyn Aligner) -> Self {
        self.origin_aligner = aligner;
        self
    }

    /// Run the whole pipeline.
    ///
    /// # Errors
    ///
    /// Any input, aligner or output failure aborts the run. Contigs without
    /// an overlap or without an origin hit are not errors.
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        for path in [&self.options.input, &self.options.origin] {
            if !is_fasta_file(path) {
                warn!("{} does not have a FASTA file extension", path.display());
            }
        }

        let contigs = read_contigs(&self.options.input)?;
        info!(
            "Loaded {} contigs ({} bp) from {}",
            contigs.len(),
            contigs.total_length(),
            self.options.input.display()
        );
        let origins = read_contigs(&self.options.origin)?;
        info!(
            "Loaded {} origin sequence(s) from {}",
            origins.len(),
            self.options.origin.display()
        );

        std::fs::create_dir_all(&self.options.working_dir)?;
        let workspace = Workspace::create(&self.options.working_dir, self.options.debug)?;
        debug!("Intermediate files in {}", workspace.path().display());

        let contigs_path = plain_fasta(
            &self.options.input,
            &contigs,
            workspace.path(),
            "input_contigs.fa",
        )?;
        let origin_path = plain_fasta(
            &self.options.origin,
            &origins,
            workspace.path(),
            "origins.fa",
        )?;

        // Overlap detection and trimming
        let self_alignments = without_self_hits(self.self_aligner.align(
            &contigs_path,
            &contigs_path,
            &workspace.path().join(SELF_ALIGNMENTS_FILE),
            self.config.overlap_percent_identity,
        )?);
        let overlaps = OverlapDetector::new(&self.config).detect(&contigs, &self_alignments);
        let trimmed = trim_contigs(&contigs, &overlaps)?;
        info!(
            "{} of {} contigs have a terminal overlap",
            trimmed.circularisable.len(),
            contigs.len()
        );

        let trimmed_path = workspace.path().join(TRIMMED_FILE);
        write_contigs(&trimmed_path, &trimmed.contigs)?;

        // Orientation and naming
        let mut circular_ids = trimmed.circularisable.clone();
        circular_ids.sort();

        let origin_alignments = if circular_ids.is_empty() {
            Vec::new()
        } else {
            self.origin_aligner.align(
                &origin_path,
                &trimmed_path,
                &workspace.path().join(ORIGIN_ALIGNMENTS_FILE),
                self.config.origin_hit_percent_identity,
            )?
        };

        let oriented = OrientationResolver::new(&self.config).resolve(
            &trimmed.contigs,
            &circular_ids,
            &origin_alignments,
        )?;
        let with_origin: HashSet<&str> = oriented
            .iter()
            .filter(|o| o.origin.is_some())
            .map(|o| o.contig.name.as_str())
            .collect();
        let names = assign_names(&circular_ids, |id| with_origin.contains(id));

        // Output
        let mut renamed = ContigSet::new();
        for o in &oriented {
            let name = names
                .get(&o.contig.name)
                .ok_or_else(|| CirculariseError::MissingContig(o.contig.name.clone()))?;
            renamed
                .insert(o.contig.renamed(name.clone()))
                .map_err(|c| PipelineError::NameCollision(c.name))?;
        }
        if self.config.keep_linear {
            for contig in &trimmed.contigs {
                if !names.contains_key(&contig.name) {
                    renamed
                        .insert(contig.clone())
                        .map_err(|c| PipelineError::NameCollision(c.name))?;
                }
            }
        }
        write_contigs(
            &workspace.path().join(self.options.unsorted_file_name()),
            &renamed,
        )?;

        let mut by_length: Vec<&Contig> = renamed.iter().collect();
        by_length.sort_by(|a, b| b.len().cmp(&a.len()));

        let output = self.options.output_path();
        write_atomically(&output, by_length)?;
        info!("Wrote {} contigs to {}", renamed.len(), output.display());

        let outcomes = self.outcomes(
            &contigs,
            &trimmed.contigs,
            &trimmed.circularisable,
            &oriented,
            &names,
        );
        let intermediates = workspace.finish();

        Ok(RunSummary {
            input: self.options.input.clone(),
            output,
            intermediates,
            config: self.config.clone(),
            contigs: outcomes,
        })
    }

    fn outcomes(
        &self,
        contigs: &ContigSet,
        trimmed: &ContigSet,
        circularisable: &[String],
        oriented: &[OrientedContig],
        names: &NameMap,
    ) -> Vec<ContigOutcome> {
        let oriented: HashMap<&str, &OrientedContig> = oriented
            .iter()
            .map(|o| (o.contig.name.as_str(), o))
            .collect();
        let circularisable: HashSet<&str> = circularisable.iter().map(String::as_str).collect();

        contigs
            .iter()
            .map(|contig| {
                let name = contig.name.as_str();
                let trimmed_length = circularisable
                    .contains(name)
                    .then(|| trimmed.get(name).map_or(0, Contig::len));

                match oriented.get(name) {
                    Some(o) => ContigOutcome {
                        contig: contig.name.clone(),
                        output_name: names.get(name).cloned(),
                        classification: if o.origin.is_some() {
                            Classification::Chromosome
                        } else {
                            Classification::Plasmid
                        },
                        original_length: contig.len(),
                        trimmed_length,
                        final_length: o.contig.len(),
                        origin: o.origin.clone(),
                    },
                    None => ContigOutcome {
                        contig: contig.name.clone(),
                        output_name: self.config.keep_linear.then(|| contig.name.clone()),
                        classification: Classification::Linear,
                        original_length: contig.len(),
                        trimmed_length,
                        final_length: contig.len(),
                        origin: None,
                    },
                }
            })
            .collect()
    }
}

/// Drop the trivial diagonal hit of each sequence against itself
#[must_use]
pub fn without_self_hits(mut alignments: Vec<AlignmentRecord>) -> Vec<AlignmentRecord> {
    alignments.retain(|a| !a.is_self_hit());
    alignments
}

/// Path the aligner can read: the original file, or an uncompressed copy of it in `dir`
///
/// # Errors
///
/// Returns `ParseError::Io` if the copy cannot be written.
pub fn plain_fasta(
    path: &Path,
    contigs: &ContigSet,
    dir: &Path,
    copy_name: &str,
) -> Result<PathBuf, ParseError> {
    if !is_gzipped(path) {
        return Ok(path.to_path_buf());
    }
    let copy = dir.join(copy_name);
    write_contigs(&copy, contigs)?;
    Ok(copy)
}

/// Write to a temporary file next to `path`, then rename it into place
fn write_atomically<'c, I>(path: &Path, contigs: I) -> Result<(), PipelineError>
where
    I: IntoIterator<Item = &'c Contig>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let temp = NamedTempFile::new_in(dir)?;
    write_contigs_to(BufWriter::new(temp.as_file()), contigs)?;
    temp.persist(path).map_err(|e| PipelineError::Io(e.error))?;
    Ok(())
}
