use std::process::{Command, Output};

fn rampart(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rampart"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to launch rampart binary")
}

#[test]
fn help_lists_run_options() {
    let output = rampart(&["--help"]);
    assert!(output.status.success());

    let help = String::from_utf8_lossy(&output.stdout);
    for flag in ["--place", "--ticks", "--config", "--movement"] {
        assert!(help.contains(flag), "help text is missing {flag}");
    }
}

#[test]
fn short_run_prints_summary() {
    let output = rampart(&["--ticks", "5", "--place", "archer@6,4"]);
    assert!(output.status.success(), "{output:?}");

    let summary = String::from_utf8_lossy(&output.stdout);
    assert!(summary.contains("ticks=5"), "{summary}");
    assert!(summary.contains("currency=30"), "{summary}");
    assert!(summary.contains("towers=2"), "{summary}");
    assert!(summary.contains("state=Active"), "{summary}");
}

#[test]
fn malformed_placement_is_rejected() {
    let output = rampart(&["--place", "archer@six,4"]);
    assert!(!output.status.success());
}
