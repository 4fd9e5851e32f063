use std::process::{Command, Output};

fn dusk_defence(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dusk-defence"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run dusk-defence")
}

#[test]
fn stock_run_greets_then_reports_victory() {
    let output = dusk_defence(&["--seed", "5"]);

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).expect("utf-8 report");
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("Welcome to Dusk Defence. Survive the night."));
    assert!(
        lines.any(|line| line.split_whitespace().collect::<Vec<_>>() == ["outcome:", "victory"]),
        "{stdout}"
    );
}

#[test]
fn headless_run_prints_a_json_report() {
    let output = dusk_defence(&["--seed", "3", "--days", "1", "--dt-ms", "250", "--report", "json"]);

    assert!(output.status.success(), "{output:?}");
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout holds one JSON report");
    assert_eq!(report["seed"], 3);
    assert!(matches!(
        report["outcome"].as_str(),
        Some("victory" | "defeat" | "ongoing")
    ));
    assert!(report["days_survived"].as_u64().is_some());
}

#[test]
fn same_seed_prints_the_same_report() {
    let args = [
        "--seed",
        "11",
        "--days",
        "1",
        "--dt-ms",
        "250",
        "--victory-threshold",
        "100000",
        "--report",
        "json",
    ];

    let first = dusk_defence(&args);
    let second = dusk_defence(&args);

    assert!(first.status.success(), "{first:?}");
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn zero_millisecond_step_is_rejected_before_running() {
    let output = dusk_defence(&["--dt-ms", "0"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--dt-ms"));
}
