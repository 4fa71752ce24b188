//! End-to-end runs of the `seats` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const MUNICIPAL: &str = r#"{
  "title": "Town council",
  "contest": {
    "method": "municipal",
    "seats": 11,
    "population": 50000,
    "votes": { "A": 5100, "B": 3050, "C": 2010 }
  }
}"#;

fn contest(dir: &Path, name: &str, body: &str) -> PathBuf {
    let p = dir.join(name);
    fs::write(&p, body).unwrap();
    p
}

fn seats() -> Command {
    Command::cargo_bin("seats").unwrap()
}

#[test]
fn run_writes_result_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let input = contest(dir.path(), "town.json", MUNICIPAL);
    let out = dir.path().join("out");

    seats()
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .args(["--render", "json", "html"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("RES:"));

    let result: serde_json::Value =
        serde_json::from_slice(&fs::read(out.join("result.json")).unwrap()).unwrap();
    assert_eq!(result["method"], "municipal");
    assert_eq!(result["outcome"]["distribution"]["A"], 7);
    assert_eq!(result["outcome"]["quota_seats"], 2);

    let report: serde_json::Value =
        serde_json::from_slice(&fs::read(out.join("report.json")).unwrap()).unwrap();
    assert_eq!(report["integrity"]["result_id"], result["id"]);
    assert_eq!(report["quota"]["party"], "A");

    let html = fs::read_to_string(out.join("report.html")).unwrap();
    assert!(html.contains("<h1>Town council</h1>"));
}

#[test]
fn reruns_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let input = contest(dir.path(), "town.json", MUNICIPAL);
    let (a, b) = (dir.path().join("a"), dir.path().join("b"));
    for out in [&a, &b] {
        seats().arg("--input").arg(&input).arg("--out").arg(out).arg("--quiet").assert().success();
    }
    assert_eq!(fs::read(a.join("result.json")).unwrap(), fs::read(b.join("result.json")).unwrap());
}

#[test]
fn seed_switches_tie_policy() {
    let dir = tempfile::tempdir().unwrap();
    let input = contest(
        dir.path(),
        "tie.json",
        r#"{"contest":{"method":"dhondt","seats":1,"votes":{"A":50,"B":50}}}"#,
    );
    seats()
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(dir.path())
        .args(["--seed", "0x2A", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let result: serde_json::Value =
        serde_json::from_slice(&fs::read(dir.path().join("result.json")).unwrap()).unwrap();
    assert_eq!(result["tie_policy"]["kind"], "lots");
    assert_eq!(result["tie_policy"]["seed"], 42);
}

#[test]
fn validate_only_prints_report_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = contest(
        dir.path(),
        "d.json",
        r#"{"contest":{"method":"district","districts":{"North":2},
            "records":[{"district":"North","votes":{"A":5}},{"district":"Lost","votes":{"A":1}}]}}"#,
    );
    let out = dir.path().join("out");
    seats()
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("district.unassigned"));
    assert!(!out.exists());
}

#[test]
fn exit_codes_follow_error_kind() {
    let dir = tempfile::tempdir().unwrap();

    // Missing input: argument check.
    seats().args(["--input", "no/such/file.json"]).assert().code(2);

    // Malformed JSON.
    let broken = contest(dir.path(), "broken.json", "{ nope");
    seats().arg("--input").arg(&broken).assert().code(2).stderr(predicate::str::contains("json"));

    // Work bound exceeded.
    let huge = contest(
        dir.path(),
        "huge.json",
        r#"{"contest":{"method":"dhondt","seats":4000000000,"votes":{"A":1,"B":1,"C":1}}}"#,
    );
    seats()
        .arg("--input")
        .arg(&huge)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("seats.too_many"));

    // Unknown renderer is rejected by clap.
    let ok = contest(dir.path(), "ok.json", MUNICIPAL);
    seats().arg("--input").arg(&ok).args(["--render", "pdf"]).assert().code(2);
}
