//! seat_pipeline: deterministic surface for one contest (load → validate → allocate → build).
//! JSON, hashing and file access go through `seat_io`; the math lives in `seat_algo`.

#![forbid(unsafe_code)]

use std::path::Path;

use seat_core::TiePolicy;
use seat_io::loader::{self, ContestFile};
use thiserror::Error;
use tracing::{info, warn};

pub mod allocate;
pub mod build_result;
pub mod validate;

pub use allocate::{allocate, DhondtOutcome, Outcome};
pub use build_result::{build_result, EngineMeta, ResultDoc, ResultInputs};
pub use validate::{validate, Severity, ValidationIssue, ValidationReport};

/// Single error surface for the pipeline orchestration.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Io(#[from] seat_io::IoError),

    /// Contest failed semantic validation (first error shown, count of the rest).
    #[error("validation failed: {first}{}", more_suffix(.more))]
    Validate { first: String, more: usize },

    #[error("build error: {0}")]
    Build(String),
}

fn more_suffix(more: &usize) -> String {
    if *more > 0 {
        format!(" (+{more} more)")
    } else {
        String::new()
    }
}

/// Caller knobs that are not part of the contest file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Overrides the file's tie policy with `Lots { seed }`.
    pub seed_override: Option<u64>,
}

impl RunOptions {
    /// Effective tie policy for a contest file.
    pub fn tie_policy(&self, file: &ContestFile) -> TiePolicy {
        match self.seed_override {
            Some(seed) => TiePolicy::Lots { seed },
            None => file.tie_policy,
        }
    }
}

/// Top-level pipeline outputs.
#[derive(Debug, Clone)]
pub struct PipelineOutputs {
    pub result: ResultDoc,
    pub validation: ValidationReport,
}

/// Validate, allocate and build the result for an already parsed contest.
pub fn run_contest(
    file: &ContestFile,
    input_sha256: Option<String>,
    opts: RunOptions,
) -> Result<PipelineOutputs, PipelineError> {
    let validation = check(file)?;
    let tie = opts.tie_policy(file);
    let outcome = allocate(&file.contest, tie);

    let inputs = ResultInputs {
        title: file.title.clone(),
        method: file.contest.method(),
        tie_policy: tie,
        input_sha256,
        warnings: validation.warnings().cloned().collect(),
    };
    let result = build_result(inputs, outcome)?;
    info!(id = %result.id, "contest complete");
    Ok(PipelineOutputs { result, validation })
}

/// Load a contest file from disk and run it.
pub fn run_from_path(path: &Path, opts: RunOptions) -> Result<PipelineOutputs, PipelineError> {
    let loaded = loader::load_contest_file(path)?;
    run_contest(&loaded.file, Some(loaded.input_sha256), opts)
}

/// Load and validate only; no allocation.
pub fn validate_path(path: &Path) -> Result<ValidationReport, PipelineError> {
    let loaded = loader::load_contest_file(path)?;
    check(&loaded.file)
}

fn check(file: &ContestFile) -> Result<ValidationReport, PipelineError> {
    let report = validate(&file.contest);
    for issue in report.warnings() {
        warn!(code = issue.code, at = %issue.at, "{}", issue.message);
    }
    let failure = {
        let mut errors = report.errors();
        match errors.next() {
            Some(first) => {
                let first = format!("{} at {}: {}", first.code, first.at, first.message);
                Some(PipelineError::Validate { first, more: errors.count() })
            }
            None => None,
        }
    };
    match failure {
        Some(err) => Err(err),
        None => Ok(report),
    }
}
