//! Integration tests for the tidyrun CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempDir;

fn tidyrun(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tidyrun").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn write_database(dir: &Path, inputs: &[&str]) -> std::path::PathBuf {
    let entries: Vec<_> = inputs
        .iter()
        .map(|input| {
            serde_json::json!({
                "directory": "/mnt/c/build",
                "command": format!("c++ -c {input}"),
                "file": input,
            })
        })
        .collect();

    let path = dir.join("compile_commands.json");
    fs::write(&path, serde_json::to_string_pretty(&entries).unwrap()).unwrap();
    path
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let temp_dir = TempDir::new().unwrap();
    tidyrun(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("clang-tidy"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    let temp_dir = TempDir::new().unwrap();
    tidyrun(temp_dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tidyrun"));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    let temp_dir = TempDir::new().unwrap();
    tidyrun(temp_dir.path())
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_run_rejects_missing_database() {
    let temp_dir = TempDir::new().unwrap();
    tidyrun(temp_dir.path())
        .args(["run", "nope/compile_commands.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found or invalid"));
}

#[test]
fn test_run_rejects_malformed_database() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("compile_commands.json"), "{ not json").unwrap();

    tidyrun(temp_dir.path())
        .args(["run", "compile_commands.json", "--clang-tidy", "echo"])
        .assert()
        .failure();

    assert!(!temp_dir.path().join("tidy-reports").exists());
}

#[test]
fn test_dry_run_prints_commands() {
    let temp_dir = TempDir::new().unwrap();
    write_database(temp_dir.path(), &["/mnt/c/src/a.cpp", "/mnt/c/src/b.cpp"]);

    tidyrun(temp_dir.path())
        .args([
            "run",
            "compile_commands.json",
            "--dry-run",
            "--clang-tidy",
            "clang-tidy-18",
            "--checks",
            "-*,bugprone-*",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("clang-tidy-18 --quiet"))
        .stdout(predicate::str::contains("--checks=\"-*,bugprone-*\""))
        .stdout(predicate::str::contains("/mnt/c/src/b.cpp"));

    assert!(!temp_dir.path().join("tidy-reports").exists());
}

#[cfg(unix)]
#[test]
fn test_run_with_echo_writes_one_file_per_translation_unit() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = ["src/a.cpp", "src/b.cpp", "lib/a.cpp"];
    write_database(temp_dir.path(), &inputs);

    tidyrun(temp_dir.path())
        .args([
            "run",
            "compile_commands.json",
            "--clang-tidy",
            "echo",
            "--checks",
            "-*",
            "-j",
            "2",
            "-o",
            "out",
        ])
        .assert()
        .success();

    let out = temp_dir.path().join("out");
    assert_eq!(fs::read_dir(&out).unwrap().count(), 3);

    for input in inputs {
        let content =
            fs::read_to_string(out.join(tidyrun::analyzer::output_file_name(input))).unwrap();
        assert_eq!(
            content,
            format!("--quiet --header-filter=\".*\" --checks=\"-*\" {input} -- c++ -c {input}\n\n")
        );
    }
}

#[cfg(unix)]
#[test]
fn test_run_with_silent_analyzer_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    write_database(temp_dir.path(), &["a.cpp", "b.cpp"]);

    tidyrun(temp_dir.path())
        .args(["run", "compile_commands.json", "--clang-tidy", "false"])
        .assert()
        .success();

    let out = temp_dir.path().join("tidy-reports");
    assert!(out.is_dir());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[cfg(unix)]
#[test]
fn test_terminated_run_exits_with_failure() {
    let temp_dir = TempDir::new().unwrap();
    write_database(temp_dir.path(), &["a.cpp", "b.cpp", "c.cpp"]);

    // The shell expands ${IFS}, so each job sleeps before printing nothing
    let child = std::process::Command::new(assert_cmd::cargo::cargo_bin("tidyrun"))
        .current_dir(temp_dir.path())
        .env_remove("RUST_LOG")
        .args([
            "run",
            "compile_commands.json",
            "--launcher",
            "shell",
            "--clang-tidy",
            "sleep${IFS}3;true",
            "-j",
            "1",
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    std::thread::sleep(Duration::from_millis(800));
    let killed = std::process::Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(killed.success());

    let output = child.wait_with_output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cancelled after 1/3"), "stderr: {stderr}");
}

#[test]
fn test_export_converts_paths_and_appends_options() {
    let temp_dir = TempDir::new().unwrap();
    write_database(temp_dir.path(), &["/mnt/c/src/a.cpp"]);

    tidyrun(temp_dir.path())
        .args([
            "export",
            "compile_commands.json",
            "--path-converter",
            "wsl-to-windows",
            "--extra-arg",
            "-std=c++17",
            "-o",
            "exported.json",
        ])
        .assert()
        .success();

    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("exported.json")).unwrap())
            .unwrap();

    assert_eq!(
        exported,
        serde_json::json!([{
            "directory": "C:\\build",
            "command": "c++ -c C:\\src\\a.cpp -std=c++17",
            "file": "C:\\src\\a.cpp",
        }])
    );
}

#[test]
fn test_export_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    write_database(temp_dir.path(), &["a.cpp"]);

    tidyrun(temp_dir.path())
        .args(["export", "compile_commands.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"command\": \"c++ -c a.cpp\""));
}

#[test]
fn test_config_show_reports_defaults() {
    let temp_dir = TempDir::new().unwrap();
    tidyrun(temp_dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"output_directory\": \"tidy-reports\""));
}

#[test]
fn test_custom_config_file_is_applied() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("custom.toml");
    fs::write(
        &config,
        r#"
checks = "-*,modernize-*"

[parallel]
workers = 3
"#,
    )
    .unwrap();

    tidyrun(temp_dir.path())
        .args(["--config", "custom.toml", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-*,modernize-*"))
        .stdout(predicate::str::contains("\"workers\": 3"));
}

#[test]
fn test_environment_overrides_config() {
    let temp_dir = TempDir::new().unwrap();
    tidyrun(temp_dir.path())
        .env("TIDYRUN_CHECKS", "-*,cert-*")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-*,cert-*"));
}
