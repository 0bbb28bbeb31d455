//! Integration tests for the inkpath facade and the `inkpath-render` tool.

use inkpath::{Draw, PixelMode, parse_symbol};
use std::process::Command;

fn render_tool() -> Command {
    Command::new(env!("CARGO_BIN_EXE_inkpath-render"))
}

#[test]
fn test_facade_draws_symbol() {
    let mut draw = Draw::new(PixelMode::Rgba, 32, 32, None).unwrap();
    let path = parse_symbol("M4,4 h24 v24 h-24 z", 1.0).unwrap();
    let brush = draw.brush("navy", 255).unwrap();
    draw.path(&path, None, Some(&brush)).unwrap();

    let bytes = draw.to_bytes();
    let center = (16 * 32 + 16) * 4;
    assert_eq!(&bytes[center..center + 4], &[0, 0, 128, 255]);
}

#[test]
fn test_cli_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.png");

    let status = render_tool()
        .args(["M2,2 L30,2 L30,30 Z"])
        .arg(&output)
        .args(["--size", "32x32", "--brush", "#00ff00", "--pen", "black:2"])
        .status()
        .unwrap();
    assert!(status.success());

    let draw = Draw::from_png(PixelMode::Rgb, &output).unwrap();
    assert_eq!(draw.size(), (32, 32));
    let bytes = draw.to_bytes();
    // (24, 10) lies inside the triangle, away from its edges
    let inside = (10 * 32 + 24) * 3;
    assert_eq!(&bytes[inside..inside + 3], &[0, 255, 0]);
}

#[test]
fn test_cli_reports_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("bad.png");

    let result = render_tool()
        .args(["M0,0 X1,1"])
        .arg(&output)
        .output()
        .unwrap();
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Parse error at offset 5"), "stderr: {}", stderr);
    assert!(!output.exists());
}

#[test]
fn test_cli_usage_without_arguments() {
    let result = render_tool().output().unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Usage"));
}
