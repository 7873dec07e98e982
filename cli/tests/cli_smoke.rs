//! Black-box smoke tests driving the `laser-preview` binary through
//! `cargo`'s built-in integration-test binary resolution.

use std::io::Write as _;
use std::process::{Command, Stdio};

fn run_preview(args: &[&str], gcode: &str) -> std::process::Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_laser-preview"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn laser-preview");

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(gcode.as_bytes())
        .unwrap();

    child.wait_with_output().expect("failed to wait on child")
}

#[test]
fn empty_gcode_exits_zero_and_writes_a_png_to_stdout() {
    let out = run_preview(&[], "");
    assert!(out.status.success());
    assert_eq!(&out.stdout[0..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
}

#[test]
fn simple_program_renders_to_an_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.png");

    let out = run_preview(
        &["--output", path.to_str().unwrap(), "--pixel-size", "0.1"],
        "G1 X0 Y0\nM3 S255\nG1 X1\nM5\n",
    );

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[0..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
}

#[test]
fn invalid_pixel_size_exits_nonzero() {
    let out = run_preview(&["--pixel-size", "0"], "");
    assert!(!out.status.success());
    assert!(!String::from_utf8_lossy(&out.stderr).is_empty());
}

#[test]
fn unknown_flag_exits_one_not_clap_default_two() {
    let out = run_preview(&["--does-not-exist"], "");
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&out.stderr).is_empty());
}

#[test]
fn missing_option_value_exits_one_not_clap_default_two() {
    let out = run_preview(&["--pixel-size"], "");
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn empty_input_with_seed_dimensions_renders_a_blank_canvas_of_that_size() {
    let out = run_preview(&["--width", "10", "--height", "10"], "");
    assert!(out.status.success());
    let img = image::load_from_memory(&out.stdout).unwrap();
    assert_eq!((img.width(), img.height()), (10, 10));
    assert!(img.to_luma8().pixels().all(|p| p.0[0] == 255));
}
