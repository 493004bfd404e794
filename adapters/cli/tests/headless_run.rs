use std::process::{Command, Output};

fn sky_battle(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sky-battle"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch sky-battle")
}

#[test]
fn headless_runs_print_a_reproducible_summary() {
    let args = ["--headless", "--seed", "17", "--max-ticks", "400"];
    let first = sky_battle(&args);
    let second = sky_battle(&args);

    assert!(first.status.success(), "headless run should succeed");
    let summary = String::from_utf8_lossy(&first.stdout);
    assert!(summary.contains("seed: 17"), "summary: {summary}");
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn unknown_start_level_exits_with_failure() {
    let output = sky_battle(&["--headless", "--start-level", "9"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown level 9"), "stderr: {stderr}");
}

#[test]
fn invalid_shield_probability_is_rejected() {
    let output = sky_battle(&["--headless", "--shield-probability", "2.0"]);

    assert!(!output.status.success());
}
