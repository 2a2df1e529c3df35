use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_chatmark-cli"))
}

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let mut path = env::temp_dir();
    let now = SystemTime::now().duration_since(UNIX_EPOCH).expect("time");
    let file_name = format!(
        "chatmark_cli_{}_{}_{}.md",
        name,
        now.as_secs(),
        now.subsec_nanos()
    );
    path.push(file_name);
    fs::write(&path, contents).expect("write temp file");
    path
}

#[test]
fn renders_file_to_html() {
    let input = temp_file("formatting", "__hola__ y **mundo**\n");
    let output = Command::new(bin_path())
        .arg(input.to_str().expect("path"))
        .output()
        .expect("run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<u>hola</u>"), "stdout: {stdout}");
    assert!(stdout.contains("<strong>mundo</strong>"), "stdout: {stdout}");
}

#[test]
fn no_emoji_flag_keeps_shortcodes_verbatim() {
    let input = temp_file("no_emoji", "Status :green_circle: listo\n");
    let output = Command::new(bin_path())
        .args(["--no-emoji", input.to_str().expect("path")])
        .output()
        .expect("run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(":green_circle:"), "stdout: {stdout}");
    assert!(!stdout.contains("d-emoji"), "stdout: {stdout}");
}

#[test]
fn emoji_shortcodes_resolve_by_default() {
    let input = temp_file("emoji", "Status :green_circle: listo\n");
    let output = Command::new(bin_path())
        .arg(input.to_str().expect("path"))
        .output()
        .expect("run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("data-name=\"green_circle\""), "stdout: {stdout}");
}

#[test]
fn invalid_tone_exits_with_usage_error() {
    let output = Command::new(bin_path())
        .args(["--tone", "9"])
        .output()
        .expect("run");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn missing_file_reports_error() {
    let output = Command::new(bin_path())
        .arg("/nonexistent/chatmark-input.md")
        .output()
        .expect("run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "stderr: {stderr}");
}
