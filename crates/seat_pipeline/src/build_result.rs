//! build_result.rs
//! Assemble the canonical result document.
//!
//! The id is `RES:` + SHA-256 of the canonical JSON of the outcome alone, so two
//! runs that allocate identically share an id whatever their titles or inputs.

use seat_core::{ResultId, TiePolicy};
use seat_io::hasher;
use serde::Serialize;

use crate::allocate::Outcome;
use crate::validate::ValidationIssue;
use crate::PipelineError;

/// Engine identifiers echoed into every result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineMeta {
    pub name: String,
    pub version: String,
}

impl EngineMeta {
    pub fn current() -> Self {
        EngineMeta { name: "seat_engine".to_string(), version: env!("CARGO_PKG_VERSION").to_string() }
    }
}

/// Result document written as `result.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultDoc {
    pub id: ResultId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub method: String,
    pub engine: EngineMeta,
    pub tie_policy: TiePolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_sha256: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationIssue>,
    pub outcome: Outcome,
}

/// Inputs echoed into the document next to the outcome.
#[derive(Debug, Clone, Default)]
pub struct ResultInputs {
    pub title: Option<String>,
    pub method: &'static str,
    pub tie_policy: TiePolicy,
    pub input_sha256: Option<String>,
    pub warnings: Vec<ValidationIssue>,
}

pub fn build_result(inputs: ResultInputs, outcome: Outcome) -> Result<ResultDoc, PipelineError> {
    let id = hasher::result_id_from_canonical(&outcome)
        .map_err(|e| PipelineError::Build(format!("result id: {e}")))?;
    tracing::debug!(id = %id, method = inputs.method, "result built");
    Ok(ResultDoc {
        id,
        title: inputs.title,
        method: inputs.method.to_string(),
        engine: EngineMeta::current(),
        tie_policy: inputs.tie_policy,
        input_sha256: inputs.input_sha256,
        warnings: inputs.warnings,
        outcome,
    })
}
