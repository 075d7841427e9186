//! Integration tests for the markdown2 CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::cargo_bin("markdown2").unwrap()
}

#[test]
fn test_basic_stdin() {
    cli()
        .write_stdin("# Title\n\nContent\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("<h1>Title</h1>"))
        .stdout(predicate::str::contains("<p>Content</p>"));
}

#[test]
fn test_file_input() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("input.md");
    fs::write(&input_path, "Test content\n").unwrap();

    cli()
        .arg(input_path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Test content"));
}

#[test]
fn test_file_output() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("output.html");

    cli()
        .arg("-o")
        .arg(output_path.to_str().unwrap())
        .write_stdin("Output test\n")
        .assert()
        .success();

    let output = fs::read_to_string(&output_path).unwrap();
    assert!(output.contains("Output test"));
}

#[test]
fn test_dash_reads_stdin() {
    cli()
        .arg("-")
        .write_stdin("Dash test\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dash test"));
}

#[test]
fn test_multiple_files_concatenated() {
    let temp_dir = TempDir::new().unwrap();
    let a = temp_dir.path().join("a.md");
    let b = temp_dir.path().join("b.md");
    fs::write(&a, "one\n").unwrap();
    fs::write(&b, "two\n").unwrap();

    cli()
        .arg(a.to_str().unwrap())
        .arg(b.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("one"))
        .stdout(predicate::str::contains("two"));
}

#[test]
fn test_extras_tables() {
    cli()
        .arg("-x")
        .arg("tables")
        .write_stdin("a | b\n--- | ---\n1 | 2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("<table>"));
}

#[test]
fn test_extras_repeated_flag() {
    cli()
        .arg("-x")
        .arg("strike")
        .arg("-x")
        .arg("smarty-pants")
        .write_stdin("~~gone~~ \"quoted\"\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("<s>gone</s>"));
}

#[test]
fn test_extras_comma_separated() {
    cli()
        .arg("-x")
        .arg("strike,smarty-pants")
        .write_stdin("~~gone~~\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("<s>gone</s>"));
}

#[test]
fn test_extras_with_value() {
    cli()
        .arg("-x")
        .arg("toc=2")
        .write_stdin("# One\n\n## Two\n\n### Three\n")
        .assert()
        .success();
}

#[test]
fn test_unknown_extra_fails() {
    cli()
        .arg("-x")
        .arg("not-a-real-extra")
        .write_stdin("text\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not-a-real-extra"));
}

#[test]
fn test_safe_mode_escape() {
    cli()
        .arg("-s")
        .arg("escape")
        .write_stdin("<script>alert(1)</script>\n\ntext\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("&lt;script&gt;"));
}

#[test]
fn test_safe_mode_invalid_value_fails() {
    cli()
        .arg("-s")
        .arg("nonsense")
        .write_stdin("text\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid safe mode"));
}

#[test]
fn test_show_metadata() {
    cli()
        .arg("-x")
        .arg("metadata")
        .arg("--show-metadata")
        .write_stdin("title: Hello\n\nBody\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("\"title\":\"Hello\""));
}

#[test]
fn test_link_patterns_file() {
    let temp_dir = TempDir::new().unwrap();
    let patterns_path = temp_dir.path().join("patterns.txt");
    fs::write(&patterns_path, "PEP-(\\d+)\\b\thttps://peps.python.org/pep-\\1/\n").unwrap();

    cli()
        .arg("--link-patterns-file")
        .arg(patterns_path.to_str().unwrap())
        .write_stdin("See PEP-8 for style.\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("peps.python.org"));
}

#[test]
fn test_nonexistent_file_fails() {
    cli().arg("/nonexistent/file.md").assert().failure();
}

#[test]
fn test_empty_input() {
    cli().write_stdin("").assert().success();
}

#[test]
fn test_version_flag() {
    cli().arg("--version").assert().success();
}

#[test]
fn test_help_flag() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}
