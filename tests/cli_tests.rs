//! CLI integration tests for the `pseudoreach` binary.
//!
//! These tests exercise the command-line interface using `assert_cmd`, which
//! spawns the compiled binary as a subprocess and asserts on exit code,
//! stdout, and stderr. No network, database, or fixture files are needed —
//! every scenario is a small, fast, self-contained task.
//!
//! # How to run
//!
//! ```bash
//! cargo test --test cli_tests
//! ```
//!
//! # Testing strategy
//!
//! Two tiers:
//!
//! - **Argument validation**: help text, required flags, malformed values,
//!   and the configuration errors that must exit nonzero *without* printing
//!   a report line.
//! - **Report scenarios**: whole-task runs over ranges with prime counts
//!   known from the sieve, Carmichael rejections, generator seeds, backend
//!   agreement, and seed reproducibility. Stdout is parsed as JSON and
//!   checked field by field.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Constructs a `Command` targeting the compiled `pseudoreach` binary.
fn pseudoreach() -> Command {
    Command::cargo_bin("pseudoreach").unwrap()
}

/// Run a task and parse the single stdout line as JSON.
fn run_report(args: &[&str]) -> Value {
    let output = pseudoreach().args(args).output().unwrap();
    assert!(
        output.status.success(),
        "task failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).unwrap();
    let mut lines = stdout.lines();
    let line = lines.next().expect("one report line on stdout");
    assert!(lines.next().is_none(), "stdout must be a single line");
    serde_json::from_str(line).expect("report line is valid JSON")
}

// == Help and Argument Validation ==============================================

#[test]
fn help_shows_all_flags() {
    pseudoreach().arg("--help").assert().success().stdout(
        predicate::str::contains("--task-type")
            .and(predicate::str::contains("--seed-start"))
            .and(predicate::str::contains("--target-digits"))
            .and(predicate::str::contains("--prime-digits"))
            .and(predicate::str::contains("--max-steps"))
            .and(predicate::str::contains("--require-prime-factors"))
            .and(predicate::str::contains("--mod5-residue"))
            .and(predicate::str::contains("--lambda-factors"))
            .and(predicate::str::contains("--backend")),
    );
}

#[test]
fn task_type_is_required() {
    pseudoreach()
        .args(["--start", "1", "--end", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--task-type"));
}

#[test]
fn unknown_task_type_is_rejected() {
    pseudoreach()
        .args(["--task-type", "mersenne"])
        .assert()
        .failure();
}

#[test]
fn range_task_without_bounds_exits_nonzero_and_silent() {
    pseudoreach()
        .args(["--task-type", "main_odds"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn chernick_without_bounds_exits_nonzero_and_silent() {
    pseudoreach()
        .args(["--task-type", "chernick"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn malformed_prime_list_is_a_config_error() {
    pseudoreach()
        .args([
            "--task-type",
            "pomerance_modular",
            "--seed-start",
            "1",
            "--seed-end",
            "1",
            "--m-primes",
            "13,x",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn malformed_lambda_factors_are_a_config_error() {
    pseudoreach()
        .args([
            "--task-type",
            "lambda_plus_one",
            "--seed-start",
            "1",
            "--seed-end",
            "1",
            "--lambda-factors",
            "2-10",
        ])
        .assert()
        .failure();
}

#[test]
fn incompatible_crt_lists_exit_nonzero() {
    // ≡ 1 (mod 4) contradicts the built-in ≡ 3 (mod 8).
    pseudoreach()
        .args([
            "--task-type",
            "pomerance_modular",
            "--seed-start",
            "1",
            "--seed-end",
            "1",
            "--m-primes",
            "4",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("congruence"));
}

// == Report Scenarios ==========================================================

#[test]
fn main_odds_1_to_100_finds_the_24_odd_primes() {
    let report = run_report(&["--task-type", "main_odds", "--start", "1", "--end", "100"]);
    assert_eq!(report["task_type"], "main_odds");
    assert_eq!(report["checked"], 50);
    assert_eq!(report["hit_count"], 24);
    let hits = report["hits"].as_array().unwrap();
    assert_eq!(hits.len(), 24);
    assert_eq!(hits[0]["n"], "3");
    assert_eq!(hits[0]["digits"], 1);
    assert_eq!(hits[0]["meta"]["family"], "main_odds");
    assert_eq!(hits[23]["n"], "97");
    assert!(report["errors"].as_array().unwrap().is_empty());
}

#[test]
fn main_odds_even_start_rounds_up_past_two() {
    let report = run_report(&["--task-type", "main_odds", "--start", "2", "--end", "100"]);
    assert_eq!(report["checked"], 49);
    assert_eq!(report["hit_count"], 24);
}

#[test]
fn carmichael_561_is_not_a_hit() {
    let report = run_report(&["--task-type", "main_odds", "--start", "560", "--end", "562"]);
    assert_eq!(report["checked"], 1);
    assert_eq!(report["hit_count"], 0);
}

#[test]
fn max_candidates_caps_the_walk() {
    let report = run_report(&[
        "--task-type",
        "main_odds",
        "--start",
        "1",
        "--end",
        "100001",
        "--max-candidates",
        "25",
    ]);
    assert_eq!(report["checked"], 25);
}

#[test]
fn large_numbers_reports_big_hits_as_strings() {
    let report = run_report(&[
        "--task-type",
        "large_numbers",
        "--start",
        "1000000000000000008",
        "--end",
        "1000000000000000010",
    ]);
    assert_eq!(report["task_type"], "large_numbers");
    assert_eq!(report["checked"], 1);
    assert_eq!(report["hit_count"], 1);
    let hit = &report["hits"][0];
    assert_eq!(hit["n"], "1000000000000000009");
    assert_eq!(hit["digits"], 19);
    assert_eq!(hit["meta"]["family"], "large_numbers");
}

#[test]
fn chernick_k1_strict_yields_candidate_but_no_hit() {
    let report = run_report(&[
        "--task-type",
        "chernick",
        "--start",
        "1",
        "--end",
        "1",
        "--require-prime-factors",
    ]);
    assert_eq!(report["checked"], 1);
    // 1729 = 7·13·19 is Carmichael; the generator yields it, BPSW rejects it.
    assert_eq!(report["hit_count"], 0);
    assert!(report["errors"].as_array().unwrap().is_empty());
}

#[test]
fn chernick_k6_strict_yields_candidate_but_no_hit() {
    let report = run_report(&[
        "--task-type",
        "chernick",
        "--start",
        "6",
        "--end",
        "6",
        "--require-prime-factors",
    ]);
    // 37, 73, 109 are all prime; 294409 is Carmichael and rejected.
    assert_eq!(report["checked"], 1);
    assert_eq!(report["hit_count"], 0);
}

#[test]
fn pomerance_lite_seed_one_is_deterministic() {
    let args = [
        "--task-type",
        "pomerance_lite",
        "--seed-start",
        "1",
        "--seed-end",
        "1",
        "--target-digits",
        "10",
        "--prime-digits",
        "3",
    ];
    let first = run_report(&args);
    let second = run_report(&args);
    assert_eq!(first["checked"], 1);
    assert!(first["errors"].as_array().unwrap().is_empty());
    // Products of distinct 3-digit primes live far below 2^64, where BPSW
    // has no false positives: never a hit, never an error.
    assert_eq!(first["hit_count"], 0);
    assert_eq!(first["hits"], second["hits"]);
    assert_eq!(first["errors"], second["errors"]);
    assert_eq!(first["checked"], second["checked"]);
}

#[test]
fn pomerance_lite_budget_exhaustion_records_errors() {
    let report = run_report(&[
        "--task-type",
        "pomerance_lite",
        "--seed-start",
        "5",
        "--seed-end",
        "7",
        "--target-digits",
        "10",
        "--prime-digits",
        "3",
        "--max-steps",
        "1",
    ]);
    assert_eq!(report["checked"], 3);
    let errors = report["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0]["seed"], 5);
    assert_eq!(errors[0]["error"], "generation_failed");
}

#[test]
fn lambda_plus_one_custom_pool_runs() {
    let report = run_report(&[
        "--task-type",
        "lambda_plus_one",
        "--seed-start",
        "1",
        "--seed-end",
        "2",
        "--target-digits",
        "6",
        "--lambda-factors",
        "2:10,3:6,5:4",
    ]);
    assert_eq!(report["task_type"], "lambda_plus_one");
    assert_eq!(report["checked"], 2);
    assert!(report["errors"].as_array().unwrap().is_empty());
}

#[test]
fn seed_range_falls_back_to_start_end() {
    let report = run_report(&[
        "--task-type",
        "lambda_plus_one",
        "--start",
        "1",
        "--end",
        "2",
        "--target-digits",
        "6",
    ]);
    assert_eq!(report["checked"], 2);
}

#[test]
fn backends_agree_on_a_range_task() {
    let native = run_report(&["--task-type", "main_odds", "--start", "1", "--end", "2000"]);
    let gmp = run_report(&[
        "--task-type",
        "main_odds",
        "--start",
        "1",
        "--end",
        "2000",
        "--backend",
        "gmp",
    ]);
    assert_eq!(native["checked"], gmp["checked"]);
    assert_eq!(native["hit_count"], gmp["hit_count"]);
    assert_eq!(native["hits"], gmp["hits"]);
}

#[test]
fn timestamps_are_iso8601_utc_and_ordered() {
    let report = run_report(&["--task-type", "main_odds", "--start", "1", "--end", "9"]);
    let started = report["started_at"].as_str().unwrap();
    let ended = report["ended_at"].as_str().unwrap();
    let started: chrono::DateTime<chrono::Utc> = started.parse().unwrap();
    let ended: chrono::DateTime<chrono::Utc> = ended.parse().unwrap();
    assert!(ended >= started);
}
