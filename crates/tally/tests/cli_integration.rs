//! End-to-end tests driving the tally binary over fixture reports

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

/// Run tally from inside `cwd` so no project config is picked up.
fn tally(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tally"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run tally")
}

fn json_summary(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}):\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn test_json_summary() {
    let dir = tempfile::tempdir().unwrap();
    let source = fixture("reports");
    let output = tally(dir.path(), &[source.to_str().unwrap(), "-f", "json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    // package.json sits next to the reports and is skipped, not fatal
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("package.json"), "{stderr}");

    let summary = json_summary(&output);
    assert_eq!(summary["title"], "Test Report");
    assert_eq!(summary["scenarios"]["total"], 3);
    assert_eq!(summary["scenarios"]["passed"], 1);
    assert_eq!(summary["scenarios"]["failed"], 1);
    assert_eq!(summary["scenarios"]["skipped"], 1);

    // login.json sorts before nested/search.json
    assert_eq!(summary["features"][0]["name"], "Login");
    assert_eq!(summary["features"][1]["name"], "Search");

    assert_eq!(summary["tags"]["total"], 3);
    assert_eq!(summary["tags"]["failed"], 2);
    assert_eq!(summary["tags"]["passed"], 0);
    assert_eq!(summary["tags"]["skipped"], 1);

    assert_eq!(summary["failed"][0]["name"], "Wrong password");
    assert_eq!(summary["skipped"][0]["index"], 2);
}

#[test]
fn test_writes_site() {
    let dir = tempfile::tempdir().unwrap();
    let site = dir.path().join("site");
    let source = fixture("reports");
    let output = tally(
        dir.path(),
        &[source.to_str().unwrap(), "-o", site.to_str().unwrap()],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    for relative in [
        "index.html",
        "pages/feature-summary.html",
        "pages/tag-summary.html",
        "pages/feature-scenarios/feature_0.html",
        "pages/feature-scenarios/feature_1.html",
        "pages/tag-scenarios/tag_smoke.html",
        "pages/tag-scenarios/tag_needs_20_review.html",
        "pages/tag-scenarios/tag_wip.html",
        "pages/scenario-detail/scenario_0.html",
        "pages/scenario-detail/scenario_1.html",
        "pages/scenario-detail/scenario_2.html",
    ] {
        assert!(site.join(relative).is_file(), "missing {relative}");
    }

    // Background steps lead every scenario page
    let detail = std::fs::read_to_string(site.join("pages/scenario-detail/scenario_1.html")).unwrap();
    let background = detail.find("a registered user").expect("background step");
    let own = detail.find("an error is shown").expect("scenario step");
    assert!(background < own);
    assert!(detail.contains("expected error banner"));
}

#[test]
fn test_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("tally.yaml"),
        format!(
            "title: Nightly\nsource: {}\nexclude:\n  - \"nested/**\"\n",
            fixture("reports").display()
        ),
    )
    .unwrap();

    let output = tally(dir.path(), &["-c", "tally.yaml", "-f", "json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let summary = json_summary(&output);
    assert_eq!(summary["title"], "Nightly");
    assert_eq!(summary["scenarios"]["total"], 2);
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = tally(dir.path(), &["-c", "nope.yaml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Config file not found"));
}

#[test]
fn test_no_source_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = tally(dir.path(), &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No report directory given"));
}

#[test]
fn test_check_exit_code() {
    let dir = tempfile::tempdir().unwrap();

    let failing = fixture("reports");
    let output = tally(dir.path(), &[failing.to_str().unwrap(), "--check"]);
    assert_eq!(output.status.code(), Some(1));

    let passing = fixture("passing");
    let output = tally(dir.path(), &[passing.to_str().unwrap(), "--check"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn test_unknown_status_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let site = dir.path().join("site");
    let broken = fixture("broken");
    let output = tally(
        dir.path(),
        &[broken.to_str().unwrap(), "-o", site.to_str().unwrap()],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown step status"), "{stderr}");
    assert!(stderr.contains("undefined"), "{stderr}");
    assert!(!site.exists(), "no pages are written for a failed generation");
}

#[test]
fn test_unknown_format_fails() {
    let dir = tempfile::tempdir().unwrap();
    let source = fixture("passing");
    let output = tally(dir.path(), &[source.to_str().unwrap(), "-f", "xml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown output format"));
}

#[test]
fn test_default_config_found_from_subdirectory() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join(".config/tally");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.yaml"),
        format!("title: Shop\nsource: {}\n", fixture("passing").display()),
    )
    .unwrap();

    // A Cargo.toml in between does not stop the search
    let nested = dir.path().join("tools/runner");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(dir.path().join("tools/Cargo.toml"), "").unwrap();

    let output = tally(&nested, &["-f", "json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(json_summary(&output)["title"], "Shop");
}
