// crates/seat_cli/src/args.rs
//
// Offline CLI argument surface.
// - One contest file in (--input), artifacts into --out.
// - Inputs and outputs must be local paths (no scheme://).
// - --seed accepts decimal u64 or 0x-hex (1..=16 nybbles) and forces tie by lot.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

/// Parsed CLI arguments.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "seats",
    version,
    disable_help_subcommand = true,
    about = "Allocate seats for one contest file (D'Hondt and its variants)"
)]
pub struct Args {
    /// Contest JSON file.
    #[arg(long)]
    pub input: PathBuf,

    /// Output directory (created if missing).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Report renderer(s) to emit next to result.json.
    #[arg(long, value_parser = ["json", "html"], num_args = 1..=2)]
    pub render: Vec<String>,

    /// Language tag for the HTML report phrases (en, fr).
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// Tie seed override; switches the tie policy to drawing lots.
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<u64>,

    /// Load and validate only; write nothing.
    #[arg(long)]
    pub validate_only: bool,

    /// Only warnings and errors on stderr; no summary line on stdout.
    #[arg(long)]
    pub quiet: bool,

    /// Emit log lines as JSON objects.
    #[arg(long)]
    pub log_json: bool,
}

/// Errors surfaced by argument checks after clap parsing.
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be a local file (no scheme): {p}"),
            CliError::NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Parse argv, then check and normalize paths.
pub fn parse_and_validate() -> Result<Args, CliError> {
    check(Args::parse())
}

fn check(mut args: Args) -> Result<Args, CliError> {
    ensure_local_path(&args.input)?;
    ensure_local_path(&args.out)?;

    let meta = fs::metadata(&args.input)
        .map_err(|_| CliError::NotFound(format!("--input {}", args.input.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("--input {}", args.input.display())));
    }

    args.input = normalize_path(&args.input);
    args.out = normalize_path(&args.out);
    args.render.sort();
    args.render.dedup();
    Ok(args)
}

/// Decimal u64 or 0x-hex (1..=16 nybbles).
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty seed".into());
    }
    if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if rest.is_empty() || rest.len() > 16 || !rest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("hex seed must be 1..16 hex digits".into());
        }
        u64::from_str_radix(rest, 16).map_err(|_| "hex seed out of range".into())
    } else {
        s.parse::<u64>().map_err(|_| "decimal seed must be a valid u64".into())
    }
}

#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    match p.to_str() {
        Some(s) if has_scheme(s) => Err(CliError::NonLocalPath(s.to_string())),
        _ => Ok(()),
    }
}

/// Absolute path; falls back to CWD-relative when the path does not exist yet.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_parser_decimal_and_hex() {
        assert_eq!(parse_seed("42").unwrap(), 42u64);
        assert_eq!(parse_seed("0x2A").unwrap(), 42u64);
        assert_eq!(parse_seed("0xFFFFFFFFFFFFFFFF").unwrap(), u64::MAX);
        assert!(parse_seed("0x").is_err());
        assert!(parse_seed("0xFFFFFFFFFFFFFFFFF").is_err()); // 17 nybbles
        assert!(parse_seed("-1").is_err());
        assert!(parse_seed("").is_err());
    }

    #[test]
    fn schemes_are_rejected() {
        assert!(ensure_local_path(Path::new("http://x/contest.json")).is_err());
        assert!(ensure_local_path(Path::new("file:///tmp/contest.json")).is_err());
        assert!(ensure_local_path(Path::new("/tmp/contest.json")).is_ok());
        assert!(ensure_local_path(Path::new("out")).is_ok());
    }

    #[test]
    fn renderers_are_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("c.json");
        fs::write(&input, "{}").unwrap();
        let args = Args::try_parse_from([
            "seats",
            "--input",
            input.to_str().unwrap(),
            "--render",
            "html",
            "json",
            "--render",
            "html",
        ])
        .unwrap();
        let args = check(args).unwrap();
        assert_eq!(args.render, ["html", "json"]);
        assert!(args.out.is_absolute());
    }

    #[test]
    fn missing_input_is_reported() {
        let args = Args::try_parse_from(["seats", "--input", "definitely/not/here.json"]).unwrap();
        assert!(matches!(check(args), Err(CliError::NotFound(_))));
    }
}
