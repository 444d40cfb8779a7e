#![cfg(all(unix, feature = "cli"))]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/wacomiv-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

/// Graphire identification followed by a stylus stroke and lift-off.
fn graphire_capture() -> Vec<u8> {
    let mut capture = b"~#ET0405-V1.0\r".to_vec();
    capture.extend_from_slice(&[0xE0, 0x00, 0x64, 0x00, 0x00, 0x32, 0x40]);
    capture.extend_from_slice(&[0xE0, 0x00, 0x65, 0x00, 0x00, 0x33, 0x41]);
    capture.extend_from_slice(&[0xA0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    capture
}

fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line should be json"))
        .collect()
}

#[test]
fn decode_file_prints_events_and_summary() {
    let dir = unique_temp_dir("decode");
    let path = dir.join("graphire.bin");
    std::fs::write(&path, graphire_capture()).expect("capture should be writable");

    let output = Command::new(env!("CARGO_BIN_EXE_wacomiv"))
        .args(["--log-level", "error", "--format", "json", "decode"])
        .arg(&path)
        .output()
        .expect("decode should run");

    assert!(output.status.success());
    let lines = json_lines(&output.stdout);

    let types: Vec<&str> = lines
        .iter()
        .map(|line| line["type"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(
        types,
        ["capabilities", "event", "event", "event", "summary"]
    );
    assert_eq!(lines[1]["tool"], "stylus");
    assert_eq!(lines[1]["in_proximity"], true);
    assert_eq!(lines[1]["x"], 100);
    assert_eq!(lines[3]["in_proximity"], false);
    assert_eq!(lines[4]["model"], "graphire");
    assert_eq!(lines[4]["packets"], 3);
    assert_eq!(lines[4]["capabilities"]["max_pressure"], 511);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn decode_reads_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_wacomiv"))
        .args(["--log-level", "error", "--format", "pretty", "decode", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("decode should start");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(&graphire_capture())
        .expect("capture should be writable");

    let output = child.wait_with_output().expect("decode should finish");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("stylus in x=100 y=50"));
    assert!(stdout.contains("model=Wacom Graphire"));
}

#[test]
fn decode_garbage_returns_60() {
    let dir = unique_temp_dir("garbage");
    let path = dir.join("noise.bin");
    std::fs::write(&path, b"not a tablet\r").expect("capture should be writable");

    let output = Command::new(env!("CARGO_BIN_EXE_wacomiv"))
        .args(["--log-level", "error", "--format", "json", "decode"])
        .arg(&path)
        .output()
        .expect("decode should run");

    assert_eq!(output.status.code(), Some(60));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn attach_missing_device_returns_3() {
    let output = Command::new(env!("CARGO_BIN_EXE_wacomiv"))
        .args([
            "--log-level",
            "error",
            "attach",
            "/nonexistent/wacomiv-tty",
            "--timeout",
            "100ms",
        ])
        .output()
        .expect("attach should run");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("setup failed"));
}

#[test]
fn attach_rejects_unsupported_baud() {
    let output = Command::new(env!("CARGO_BIN_EXE_wacomiv"))
        .args(["attach", "/dev/null", "--baud", "300"])
        .output()
        .expect("attach should run");

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_extended_lists_build_target() {
    let output = Command::new(env!("CARGO_BIN_EXE_wacomiv"))
        .args(["version", "--extended"])
        .output()
        .expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("name: wacomiv"));
    assert!(stdout.contains("build_target:"));
}
