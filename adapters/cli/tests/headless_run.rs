use std::process::{Command, Output};

fn lane_siege(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lane-siege"))
        .args(args)
        .output()
        .expect("failed to launch the lane-siege binary")
}

#[test]
fn bounded_run_prints_banner_and_hud() {
    let output = lane_siege(&["--max-ticks", "600", "--difficulty", "easy", "--log", "off"]);
    assert!(output.status.success(), "lane-siege exited with {}", output.status);

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("Welcome to Lane Siege."));

    let hud = stdout
        .lines()
        .find(|line| line.starts_with("wave ") && line.contains(" | currency "))
        .expect("a HUD line");
    assert!(hud.contains("/3 | "), "easy matches run three waves: {hud}");
    assert!(stdout.contains("match unfinished after 600 ticks") || stdout.contains("victory = "));
}

#[test]
fn unreadable_configuration_fails_the_run() {
    let output = lane_siege(&["--config", "/nonexistent/lane-siege.toml", "--log", "off"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read match configuration"));
}
