use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "seasonsim-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_seasonsim-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("determinism"));
}

#[test]
fn cli_runs_sample_roster_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_seasonsim-tester");
    let output_path = temp_path("run");
    let roster = concat!(env!("CARGO_MANIFEST_DIR"), "/../seasonsim-game/data/sample_roster.json");
    let output = Command::new(exe)
        .args([
            "--roster",
            roster,
            "--mode",
            "double",
            "--report",
            "json",
            "--scenarios",
            "full-season,no-ties",
            "--iterations",
            "1",
            "--seeds",
            "alpha,beta",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Seasonsim Season Tester"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let results = report.as_array().expect("array");
    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r["passed"] == true));
}

#[test]
fn cli_rejects_missing_roster() {
    let exe = env!("CARGO_BIN_EXE_seasonsim-tester");
    let output = Command::new(exe)
        .args(["--roster", "/no/such/roster.json", "--iterations", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("reading roster"));
}
