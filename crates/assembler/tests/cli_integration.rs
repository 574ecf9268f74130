//! Integration tests for the picostack-asm CLI.

use assembler as _;
use processor_core as _;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn binary_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    path.pop();
    path.join("picostack-asm")
}

fn create_temp_file(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn build_simple_program() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = create_temp_file(temp_dir.path(), "simple.asm", "NOP\nLOAD 0A\n");

    let output = temp_dir.path().join("simple.bin");

    let status = Command::new(binary_path())
        .args([
            "build",
            source.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run picostack-asm");

    assert!(status.success());
    assert!(output.exists());

    let binary = fs::read(&output).unwrap();
    assert_eq!(binary.len(), 4);
    assert_eq!(&binary[0..2], &[0x00, 0x00]);
    assert_eq!(&binary[2..4], &[0x80, 0x0A]);
}

#[test]
fn build_with_default_output() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = create_temp_file(temp_dir.path(), "test.asm", "NOP\n");

    let expected_output = temp_dir.path().join("test.bin");

    let status = Command::new(binary_path())
        .args(["build", source.to_str().unwrap()])
        .current_dir(temp_dir.path())
        .status()
        .expect("failed to run picostack-asm");

    assert!(status.success());
    assert!(expected_output.exists());
}

#[test]
fn build_expands_push_pseudo_instruction() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = create_temp_file(temp_dir.path(), "push.asm", "PUSH 1234\n");

    let output = temp_dir.path().join("push.bin");

    let status = Command::new(binary_path())
        .args([
            "build",
            source.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run picostack-asm");

    assert!(status.success());
    let binary = fs::read(&output).unwrap();
    assert_eq!(binary, &[0x10, 0x34, 0x11, 0x12]);
}

#[test]
fn build_reports_errors_with_line_number() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = create_temp_file(temp_dir.path(), "bad.asm", "NOP\nFOO 01\n");

    let output = Command::new(binary_path())
        .args(["build", source.to_str().unwrap()])
        .output()
        .expect("failed to run picostack-asm");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(":2: error: unknown mnemonic 'FOO'"));
}

#[test]
fn list_decodes_a_built_image() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = create_temp_file(temp_dir.path(), "listing.asm", "start:\nJMP start\nLOAD 0A\n");

    let image = temp_dir.path().join("listing.bin");

    let status = Command::new(binary_path())
        .args([
            "build",
            source.to_str().unwrap(),
            "-o",
            image.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run picostack-asm");
    assert!(status.success());

    let result = Command::new(binary_path())
        .args(["list", image.to_str().unwrap()])
        .output()
        .expect("failed to run picostack-asm");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("000: A000  JMP 000"));
    assert!(stdout.contains("001: 800A  LOAD 00A"));
}

#[test]
fn list_rejects_odd_length_images() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = temp_dir.path().join("broken.bin");
    fs::write(&image, [0x00u8, 0x00, 0xA0]).unwrap();

    let result = Command::new(binary_path())
        .args(["list", image.to_str().unwrap()])
        .output()
        .expect("failed to run picostack-asm");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("not a word image"));
}

#[test]
fn run_executes_until_stop() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = create_temp_file(temp_dir.path(), "halts.asm", "PUSH 1234\nSTOP\n");

    let image = temp_dir.path().join("halts.bin");

    let status = Command::new(binary_path())
        .args([
            "build",
            source.to_str().unwrap(),
            "-o",
            image.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run picostack-asm");
    assert!(status.success());

    let result = Command::new(binary_path())
        .args(["run", image.to_str().unwrap()])
        .output()
        .expect("failed to run picostack-asm");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Halted at PC"));
    assert!(stdout.contains("R00 = 1234"));
}

#[test]
fn run_honors_step_limit() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = create_temp_file(temp_dir.path(), "spin.asm", "loop:\nJMP loop\n");

    let image = temp_dir.path().join("spin.bin");

    let status = Command::new(binary_path())
        .args([
            "build",
            source.to_str().unwrap(),
            "-o",
            image.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run picostack-asm");
    assert!(status.success());

    let result = Command::new(binary_path())
        .args(["run", image.to_str().unwrap(), "-s", "100"])
        .output()
        .expect("failed to run picostack-asm");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("step limit reached"));
}

#[test]
fn run_reports_faults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = create_temp_file(temp_dir.path(), "faulty.asm", "DROP\n");

    let image = temp_dir.path().join("faulty.bin");

    let status = Command::new(binary_path())
        .args([
            "build",
            source.to_str().unwrap(),
            "-o",
            image.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run picostack-asm");
    assert!(status.success());

    let result = Command::new(binary_path())
        .args(["run", image.to_str().unwrap()])
        .output()
        .expect("failed to run picostack-asm");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("fault at PC 000"));
}

#[test]
fn help_shows_usage() {
    let result = Command::new(binary_path())
        .args(["--help"])
        .output()
        .expect("failed to run picostack-asm");

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Commands:"));
    assert!(stdout.contains("build"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("run"));
}

#[test]
fn unknown_command_fails() {
    let result = Command::new(binary_path())
        .args(["unknown"])
        .output()
        .expect("failed to run picostack-asm");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("unknown command"));
}
