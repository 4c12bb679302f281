//! CLI integration tests using assert_cmd.
//!
//! The estimate subcommands are pure computation, so everything here runs
//! without a database.

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn railquote() -> Command {
    Command::cargo_bin("railquote").unwrap()
}

// --- Help and arg validation ---

#[test]
fn help_shows_all_subcommands() {
    railquote().arg("--help").assert().success().stdout(
        predicate::str::contains("serve").and(predicate::str::contains("estimate")),
    );
}

#[test]
fn help_estimate_shows_markets() {
    railquote()
        .args(["estimate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("international").and(predicate::str::contains("uk")));
}

#[test]
fn help_estimate_international_shows_args() {
    railquote()
        .args(["estimate", "international", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--country")
                .and(predicate::str::contains("--fence-type"))
                .and(predicate::str::contains("--meters")),
        );
}

#[test]
fn estimate_international_requires_country() {
    railquote()
        .args([
            "estimate",
            "international",
            "--user-name",
            "amy",
            "--project-name",
            "track",
            "--fence-type",
            "OR",
            "--meters",
            "100",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--country"));
}

// --- Estimation output ---

#[test]
fn estimate_international_prints_breakdown_json() {
    let output = railquote()
        .args([
            "estimate",
            "international",
            "--user-name",
            "amy",
            "--project-name",
            "track",
            "--country",
            "France",
            "--fence-type",
            "OR",
            "--meters",
            "136",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["work_days"], 1);
    assert_eq!(json["daily_rate_per_man"], 190.08);
    assert_eq!(json["flight_ticket"], 500.0);
}

#[test]
fn estimate_uk_prints_breakdown_json() {
    let output = railquote()
        .args([
            "estimate",
            "uk",
            "--user-name",
            "bob",
            "--project-name",
            "rail",
            "--fence-type",
            "PR",
            "--meters",
            "120",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["num_labourers"], 2);
    assert_eq!(json["work_days"], 1);
    assert_eq!(json["concrete_cost"], 240.0);
}

#[test]
fn estimate_uk_deadline_reports_infeasible() {
    railquote()
        .args([
            "estimate",
            "uk",
            "--user-name",
            "bob",
            "--project-name",
            "rail",
            "--fence-type",
            "PR",
            "--meters",
            "100000",
            "--days-available",
            "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cap"));
}

#[test]
fn estimate_unknown_country_fails() {
    railquote()
        .args([
            "estimate",
            "international",
            "--user-name",
            "amy",
            "--project-name",
            "track",
            "--country",
            "Atlantis",
            "--fence-type",
            "OR",
            "--meters",
            "100",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown country"));
}

#[test]
fn estimate_honors_rates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rates.toml");
    std::fs::write(
        &path,
        r#"
[countries]
Testland = 10.0

[uk]
daily_rate_per_man = 100.0
"#,
    )
    .unwrap();
    let output = railquote()
        .args([
            "--rates",
            path.to_str().unwrap(),
            "estimate",
            "uk",
            "--user-name",
            "bob",
            "--project-name",
            "rail",
            "--fence-type",
            "PR",
            "--meters",
            "120",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    // 2 men, 1 day at the overridden 100/day rate
    assert_eq!(json["labor_cost"], 200.0);
}
