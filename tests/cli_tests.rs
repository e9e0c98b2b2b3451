//! Integration tests for the `tagpages` command.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn tagpages_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tagpages").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Lays out a site with a project file, two tagged posts, and optionally the
/// tag layout.
fn site(layout: Option<&str>) -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("tagpages.yaml"), "site_url: https://example.org/\n").unwrap();
    fs::create_dir_all(root.join("_posts")).unwrap();
    fs::write(
        root.join("_posts").join("2021-01-01-hello.md"),
        "---\ntitle: Hello\ntags: [go, rust]\n---\nHello\n",
    )
    .unwrap();
    fs::write(
        root.join("_posts").join("2021-01-02-again.md"),
        "---\ntags: go\n---\nAgain\n",
    )
    .unwrap();
    if let Some(layout) = layout {
        fs::create_dir_all(root.join("_layouts")).unwrap();
        fs::write(root.join("_layouts").join("tag.html"), layout).unwrap();
    }
    temp
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_writes_tag_pages() {
    let temp = site(Some("---\nlayout: default\n---\n{{ .title }}|{{ .url }}"));

    tagpages_cmd().arg(temp.path()).assert().success();

    let output = temp.path().join("_site");
    assert_eq!(
        "Tag: go|https://example.org/tag/go/",
        read(output.join("tag/go/index.html"))
    );
    assert_eq!(
        "Tag: rust|https://example.org/tag/rust/",
        read(output.join("tag/rust/index.html"))
    );
}

#[test]
fn test_output_and_threads_flags() {
    let temp = site(Some("{{ .tag }}"));
    let output = TempDir::new().unwrap();

    tagpages_cmd()
        .arg(temp.path())
        .arg("--output")
        .arg(output.path())
        .args(&["--threads", "4"])
        .assert()
        .success();

    assert_eq!("rust", read(output.path().join("tag/rust/index.html")));
    assert!(!temp.path().join("_site").exists());
}

#[test]
fn test_dry_run_lists_pages_without_writing() {
    let temp = site(Some("{{ .tag }}"));

    let output = tagpages_cmd()
        .arg(temp.path())
        .arg("--dry-run")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["tag/go/index.html\tgo", "tag/rust/index.html\trust"]);
    assert!(!temp.path().join("_site").exists());
}

#[test]
fn test_runs_from_a_subdirectory() {
    let temp = site(Some("{{ .tag }}"));

    tagpages_cmd()
        .current_dir(temp.path().join("_posts"))
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("tag/go/index.html"));
}

#[test]
fn test_missing_layout_fails() {
    let temp = site(None);

    tagpages_cmd()
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Layout `tag.html` not found"));
    assert!(!temp.path().join("_site").exists());
}

#[test]
fn test_bad_thread_count_fails() {
    let temp = site(Some("{{ .tag }}"));

    tagpages_cmd()
        .arg(temp.path())
        .args(&["--threads", "many"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_no_project_file_fails() {
    let temp = TempDir::new().unwrap();

    tagpages_cmd()
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("tagpages.yaml"));
}
