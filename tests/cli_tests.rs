//! End-to-end tests of the command-line interface.
//!
//! Alignments are supplied as precomputed `show-coords` files so no MUMmer
//! installation is needed.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Deterministic pseudo-random bases
fn bases(len: usize, seed: u64) -> String {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            char::from(b"ACGT"[(state >> 62) as usize])
        })
        .collect()
}

struct Inputs {
    dir: TempDir,
    /// 10 kb contig whose first 2500 bases repeat at its end
    ctg1: String,
}

impl Inputs {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();

        let unique = bases(7500, 11);
        let ctg1 = format!("{unique}{}", &unique[..2500]);
        let linear = bases(3000, 12);
        fs::write(
            dir.path().join("assembly.fa"),
            format!(">ctg1\n{ctg1}\n>ctg2\n{linear}\n"),
        )
        .unwrap();
        fs::write(dir.path().join("dnaA.fa"), format!(">dnaA\n{}\n", bases(100, 13))).unwrap();

        // 1-based show-coords -dTlro -H lines
        fs::write(
            dir.path().join("self.coords"),
            "1\t10000\t1\t10000\t10000\t10000\t100.00\t10000\t10000\t1\t1\tctg1\tctg1\n\
             1\t2500\t7501\t10000\t2500\t2500\t99.00\t10000\t10000\t1\t1\tctg1\tctg1\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("origin.coords"),
            "101\t200\t1\t100\t100\t100\t99.00\t5001\t100\t1\t1\tctg1\tdnaA\n",
        )
        .unwrap();

        Self { dir, ctg1 }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn circularise(&self) -> Command {
        let mut cmd = Command::cargo_bin("contig-circulariser").unwrap();
        cmd.arg("circularise")
            .arg(self.path("assembly.fa"))
            .arg("--origin")
            .arg(self.path("dnaA.fa"))
            .arg("--working-dir")
            .arg(self.path("work"))
            .arg("--self-coords")
            .arg(self.path("self.coords"))
            .arg("--origin-coords")
            .arg(self.path("origin.coords"));
        cmd
    }
}

/// Records of a single-line-per-sequence or wrapped FASTA file
fn read_fasta(path: &Path) -> Vec<(String, String)> {
    let text = fs::read_to_string(path).unwrap();
    let mut records: Vec<(String, String)> = Vec::new();
    for line in text.lines() {
        if let Some(name) = line.strip_prefix('>') {
            records.push((name.to_string(), String::new()));
        } else if let Some((_, sequence)) = records.last_mut() {
            sequence.push_str(line.trim());
        }
    }
    records
}

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("contig-circulariser")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("circularise"))
        .stdout(predicate::str::contains("overlaps"));
}

#[test]
fn test_circularise_with_precomputed_alignments() {
    let inputs = Inputs::new();

    inputs
        .circularise()
        .assert()
        .success()
        .stdout(predicate::str::contains("1 chromosome(s), 0 plasmid(s), 1 linear contig(s) dropped"))
        .stdout(predicate::str::contains("ctg1 -> chromosome1"));

    let records = read_fasta(&inputs.path("work/circularised_assembly.fa"));
    assert_eq!(records.len(), 1);
    let (name, sequence) = &records[0];
    assert_eq!(name, "chromosome1");

    let trimmed = &inputs.ctg1[2500..7501];
    let expected = format!("{}{}", &trimmed[100..], &trimmed[..100]);
    assert_eq!(sequence, &expected);

    // Intermediates are removed without --debug
    assert!(!inputs.path("work/trimmed.fa").exists());
}

#[test]
fn test_keep_linear_and_debug() {
    let inputs = Inputs::new();

    inputs
        .circularise()
        .arg("--keep-linear")
        .arg("--debug")
        .arg("--output")
        .arg(inputs.path("final.fa"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Intermediate files"));

    let names: Vec<String> = read_fasta(&inputs.path("final.fa"))
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["chromosome1", "ctg2"]);

    for name in [
        "nucmer_all_contigs.coords",
        "nucmer_matches_to_dnaA.coords",
        "trimmed.fa",
        "unsorted_circularised_assembly.fa",
    ] {
        assert!(inputs.path("work").join(name).exists(), "missing {name}");
    }
}

#[test]
fn test_json_summary() {
    let inputs = Inputs::new();

    let output = inputs
        .circularise()
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let contigs = summary["contigs"].as_array().unwrap();
    assert_eq!(contigs.len(), 2);
    assert_eq!(contigs[0]["contig"], "ctg1");
    assert_eq!(contigs[0]["output_name"], "chromosome1");
    assert_eq!(contigs[0]["classification"], "chromosome");
    assert_eq!(contigs[0]["trimmed_length"], 5001);
    assert_eq!(contigs[0]["origin"]["breakpoint"], 100);
    assert_eq!(contigs[1]["classification"], "linear");
    assert!(contigs[1]["output_name"].is_null());
    assert_eq!(summary["config"]["overlap_min_length"], 2000);
}

#[test]
fn test_overlaps_tsv() {
    let inputs = Inputs::new();

    Command::cargo_bin("contig-circulariser")
        .unwrap()
        .args(["--format", "tsv", "overlaps"])
        .arg(inputs.path("assembly.fa"))
        .arg("--self-coords")
        .arg(inputs.path("self.coords"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("contig\tlength\t"))
        .stdout(predicate::str::contains(
            "ctg1\t10000\t0\t2499\t7500\t9999\t2500\t99.00\t5001",
        ))
        .stdout(predicate::str::contains("ctg2").not());
}

#[test]
fn test_inconsistent_thresholds_rejected() {
    let inputs = Inputs::new();

    inputs
        .circularise()
        .args(["--overlap-offset", "0.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not exceed"));

    assert!(!inputs.path("work/circularised_assembly.fa").exists());
}

#[test]
fn test_missing_aligner_reported() {
    let inputs = Inputs::new();

    Command::cargo_bin("contig-circulariser")
        .unwrap()
        .arg("circularise")
        .arg(inputs.path("assembly.fa"))
        .arg("--origin")
        .arg(inputs.path("dnaA.fa"))
        .arg("--working-dir")
        .arg(inputs.path("work"))
        .arg("--mummer-dir")
        .arg("/nonexistent/mummer/bin")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to run"));

    assert!(!inputs.path("work/circularised_assembly.fa").exists());
}
