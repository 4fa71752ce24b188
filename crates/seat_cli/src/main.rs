// crates/seat_cli/src/main.rs
//
// `seats` binary: load → validate → allocate → write result.json (+ reports).
//
// Exit codes:
//   0 ok
//   2 validation (bad arguments, malformed contest file, failed checks)
//   4 I/O (missing or oversized input, unwritable output)
//   5 build (result id or report could not be produced)

mod args;

mod exitcodes {
    pub const OK: u8 = 0;
    pub const VALIDATION: u8 = 2;
    pub const IO: u8 = 4;
    pub const BUILD: u8 = 5;
}

use std::fmt;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use args::{parse_and_validate as parse_cli, Args};
use seat_io::canonical_json::{write_atomic, write_canonical_file};
use seat_io::IoError;
use seat_pipeline::{run_from_path, validate_path, PipelineError, PipelineOutputs, RunOptions};
use seat_report::{build_model, render_html, render_json, ReportError};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI error buckets, one per exit code.
#[derive(Debug)]
enum MainError {
    Validation(String),
    Io(String),
    Build(String),
}

impl fmt::Display for MainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MainError::Validation(m) | MainError::Io(m) | MainError::Build(m) => f.write_str(m),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("seats: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION);
        }
    };
    init_tracing(&args);

    let outcome = if args.validate_only { validate_only(&args) } else { run_once(&args) };
    match outcome {
        Ok(()) => ExitCode::from(exitcodes::OK),
        Err(e) => {
            eprintln!("seats: error: {e}");
            ExitCode::from(map_error(&e))
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing(args: &Args) {
    let default = if args.quiet { "seat=warn" } else { "seat=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = if args.log_json { builder.json().try_init() } else { builder.compact().try_init() };
}

/// Load and check the contest; prints the validation report as JSON.
fn validate_only(args: &Args) -> Result<(), MainError> {
    let report = validate_path(&args.input).map_err(map_pipeline_err)?;
    if !args.quiet {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| MainError::Build(format!("validation report: {e}")))?;
        println!("{text}");
    }
    Ok(())
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let opts = RunOptions { seed_override: args.seed };
    let outs = run_from_path(&args.input, opts).map_err(map_pipeline_err)?;

    write_artifacts(&args.out, &outs)?;
    maybe_render_reports(args, &outs)?;

    info!(out = %args.out.display(), id = %outs.result.id, "artifacts written");
    if !args.quiet {
        println!("{}", outs.result.id);
    }
    Ok(())
}

fn write_artifacts(out_dir: &Path, outs: &PipelineOutputs) -> Result<(), MainError> {
    fs::create_dir_all(out_dir)
        .map_err(|e| MainError::Io(format!("mkdir {}: {e}", out_dir.display())))?;
    write_canonical_file(&out_dir.join("result.json"), &outs.result)
        .map_err(|e| MainError::Io(format!("write result.json: {e}")))
}

fn maybe_render_reports(args: &Args, outs: &PipelineOutputs) -> Result<(), MainError> {
    if args.render.is_empty() {
        return Ok(());
    }
    let model = build_model(&outs.result).map_err(map_report_err)?;
    for fmt in &args.render {
        let (name, body) = match fmt.as_str() {
            "json" => ("report.json", render_json(&model).map_err(map_report_err)?),
            "html" => ("report.html", render_html(&model, &args.lang)),
            other => return Err(MainError::Validation(format!("unknown renderer: {other}"))),
        };
        write_atomic(&args.out.join(name), body.as_bytes())
            .map_err(|e| MainError::Io(format!("write {name}: {e}")))?;
    }
    Ok(())
}

fn map_error(e: &MainError) -> u8 {
    match e {
        MainError::Validation(_) => exitcodes::VALIDATION,
        MainError::Io(_) => exitcodes::IO,
        MainError::Build(_) => exitcodes::BUILD,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Json { .. } | IoError::Invalid(_) => MainError::Validation(e.to_string()),
        IoError::Path(_) | IoError::TooLarge { .. } => MainError::Io(e.to_string()),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Io(io) => map_io_err(io),
        PipelineError::Validate { .. } => MainError::Validation(e.to_string()),
        PipelineError::Build(_) => MainError::Build(e.to_string()),
    }
}

fn map_report_err(e: ReportError) -> MainError {
    MainError::Build(format!("report: {e}"))
}
