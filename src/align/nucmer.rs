//! MUMmer-backed aligner.
//!
//! Runs, with `<prefix>` being `output` minus its extension:
//!
//! ```text
//! nucmer --maxmatch --nosimplify -p <prefix> <reference> <query>
//! delta-filter -i <min_identity> <prefix>.delta > <prefix>.filtered.delta
//! show-coords -dTlro -H <prefix>.filtered.delta > <output>
//! ```

use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::align::{AlignError, Aligner};
use crate::core::alignment::AlignmentRecord;
use crate::parsing::coords::parse_coords_file;

/// Paths to the MUMmer executables
#[derive(Debug, Clone)]
pub struct Nucmer {
    pub nucmer: PathBuf,
    pub delta_filter: PathBuf,
    pub show_coords: PathBuf,
}

impl Default for Nucmer {
    fn default() -> Self {
        Self {
            nucmer: PathBuf::from("nucmer"),
            delta_filter: PathBuf::from("delta-filter"),
            show_coords: PathBuf::from("show-coords"),
        }
    }
}

impl Nucmer {
    /// Use executables from a MUMmer installation's `bin` directory
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            nucmer: dir.join("nucmer"),
            delta_filter: dir.join("delta-filter"),
            show_coords: dir.join("show-coords"),
        }
    }

    /// Command lines for one alignment, in execution order.
    ///
    /// Each entry is `(program, args, stdout redirect)`.
    fn commands(
        &self,
        query: &Path,
        reference: &Path,
        output: &Path,
        min_percent_identity: f64,
    ) -> Vec<(PathBuf, Vec<OsString>, Option<PathBuf>)> {
        let prefix = output.with_extension("");
        let delta = with_suffix(&prefix, ".delta");
        let filtered = with_suffix(&prefix, ".filtered.delta");

        vec![
            (
                self.nucmer.clone(),
                vec![
                    "--maxmatch".into(),
                    "--nosimplify".into(),
                    "-p".into(),
                    prefix.into_os_string(),
                    reference.as_os_str().to_owned(),
                    query.as_os_str().to_owned(),
                ],
                None,
            ),
            (
                self.delta_filter.clone(),
                vec![
                    "-i".into(),
                    min_percent_identity.to_string().into(),
                    delta.into_os_string(),
                ],
                Some(filtered.clone()),
            ),
            (
                self.show_coords.clone(),
                vec!["-dTlro".into(), "-H".into(), filtered.into_os_string()],
                Some(output.to_path_buf()),
            ),
        ]
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

fn run(program: &Path, args: &[OsString], stdout: Option<&Path>) -> Result<(), AlignError> {
    let program_name = program.display().to_string();
    debug!(
        "Running {program_name} {}",
        args.iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let mut command = Command::new(program);
    command.args(args).stderr(Stdio::piped());
    match stdout {
        Some(path) => command.stdout(Stdio::from(File::create(path)?)),
        None => command.stdout(Stdio::null()),
    };

    let output = command.output().map_err(|source| AlignError::Spawn {
        program: program_name.clone(),
        source,
    })?;

    if !output.status.success() {
        return Err(AlignError::Failed {
            program: program_name,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

impl Aligner for Nucmer {
    fn align(
        &self,
        query: &Path,
        reference: &Path,
        output: &Path,
        min_percent_identity: f64,
    ) -> Result<Vec<AlignmentRecord>, AlignError> {
        info!(
            "Aligning {} against {} with nucmer",
            query.display(),
            reference.display()
        );
        for (program, args, stdout) in self.commands(query, reference, output, min_percent_identity)
        {
            run(&program, &args, stdout.as_deref())?;
        }
        Ok(parse_coords_file(output)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_lines() {
        let aligner = Nucmer::in_dir(Path::new("/opt/mummer/bin"));
        let commands = aligner.commands(
            Path::new("dnaA.fa"),
            Path::new("work/trimmed.fa"),
            Path::new("work/nucmer_matches_to_dnaA.coords"),
            80.0,
        );
        assert_eq!(commands.len(), 3);

        let (program, args, stdout) = &commands[0];
        assert_eq!(program, Path::new("/opt/mummer/bin/nucmer"));
        assert_eq!(
            args,
            &[
                "--maxmatch",
                "--nosimplify",
                "-p",
                "work/nucmer_matches_to_dnaA",
                "work/trimmed.fa",
                "dnaA.fa"
            ]
            .map(OsString::from)
        );
        assert!(stdout.is_none());

        let (program, args, stdout) = &commands[1];
        assert_eq!(program, Path::new("/opt/mummer/bin/delta-filter"));
        assert_eq!(
            args,
            &["-i", "80", "work/nucmer_matches_to_dnaA.delta"].map(OsString::from)
        );
        assert_eq!(
            stdout.as_deref(),
            Some(Path::new("work/nucmer_matches_to_dnaA.filtered.delta"))
        );

        let (_, args, stdout) = &commands[2];
        assert_eq!(
            args,
            &[
                "-dTlro",
                "-H",
                "work/nucmer_matches_to_dnaA.filtered.delta"
            ]
            .map(OsString::from)
        );
        assert_eq!(
            stdout.as_deref(),
            Some(Path::new("work/nucmer_matches_to_dnaA.coords"))
        );
    }

    #[test]
    fn test_missing_executable_is_spawn_error() {
        let aligner = Nucmer::in_dir(Path::new("/nonexistent/mummer"));
        let dir = tempfile::tempdir().unwrap();
        let result = aligner.align(
            Path::new("a.fa"),
            Path::new("b.fa"),
            &dir.path().join("out.coords"),
            85.0,
        );
        assert!(matches!(result, Err(AlignError::Spawn { .. })));
    }
}
