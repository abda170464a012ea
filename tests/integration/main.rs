//! Integration tests for statsync
//!
//! These tests run real batches against a real git working copy that
//! publishes to a bare remote, testing the full cycle of:
//! produce → stage → commit → pull → push

#[path = "../common/mod.rs"]
#[allow(dead_code)]
mod common;

use std::fs;
use std::path::Path;

use assert_cmd::cargo;
use predicates::prelude::*;

use common::git_repo::{TempGitRepo, run_git};

/// Helper function to create a statsync command
fn statsync() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(cargo::cargo_bin!("statsync"));
    cmd.env_remove("STATSYNC_REPO");
    cmd
}

const CONFIG: &str = r#"
[batch]
season = "2025-26"
interpreter = "sh"
delay_secs = 0

[[unit]]
name = "A"
program = "scripts/a.sh"
artifacts = ["out/a.json"]

[[unit]]
name = "B"
program = "scripts/b.sh"
artifacts = ["out/b.json"]

[[unit]]
name = "C"
program = "scripts/c.sh"
artifacts = ["out/c.json"]
"#;

/// Working copy with three producers; B writes its artifact and then fails
fn setup() -> TempGitRepo {
    let repo = TempGitRepo::new();
    repo.write_file(".statsync.toml", CONFIG);
    repo.write_file(".gitignore", ".statsync/\n");
    repo.write_file("scripts/a.sh", "printf '{\"unit\":\"%s\",\"mode\":\"%s\"}' \"$STATSYNC_UNIT\" \"$1\" > out/a.json\n");
    repo.write_file("scripts/b.sh", "echo '{\"unit\":\"B\",\"rev\":2}' > out/b.json\nexit 1\n");
    repo.write_file("scripts/c.sh", "echo '{\"unit\":\"C\"}' > out/c.json\n");
    repo.write_file("out/b.json", "{\"unit\":\"B\",\"rev\":1}\n");
    for file in [".statsync.toml", ".gitignore", "scripts", "out/b.json"] {
        repo.stage(file);
    }
    repo.commit("Add producers");
    repo.git(&["push", "origin", "main"]);
    repo
}

fn read(root: &Path, file: &str) -> String {
    fs::read_to_string(root.join(file)).unwrap()
}

// =============================================================================
// END-TO-END BATCH TESTS
// =============================================================================

/// Partial batch: failures are tolerated and only successful artifacts ship
#[test]
fn test_partial_batch_publishes_successful_artifacts() {
    let repo = setup();
    let before = repo.remote_commit_count();

    statsync()
        .arg("update")
        .current_dir(repo.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("2 succeeded, 1 failed, 0 pending"))
        .stdout(predicate::str::contains("Publish: committed 2 path(s)"));

    assert_eq!(repo.remote_commit_count(), before + 1);
    assert_eq!(repo.remote_head_files(), vec!["out/a.json", "out/c.json"]);
    let subject = repo.remote_head_subject();
    assert!(subject.starts_with("Auto-update (update): "), "{subject}");
    assert!(subject.ends_with("[2/3 units]"), "{subject}");

    // The producer saw its unit name and mode flag
    assert_eq!(read(repo.path(), "out/a.json"), "{\"unit\":\"A\",\"mode\":\"--update\"}");
    // B failed after writing: the previous artifact is untouched
    assert_eq!(read(repo.path(), "out/b.json"), "{\"unit\":\"B\",\"rev\":1}\n");
    assert!(!repo.path().join(".statsync/lock").exists());
}

/// Publishing twice with no new artifacts creates no new commit
#[test]
fn test_publish_is_idempotent() {
    let repo = setup();

    statsync().arg("update").current_dir(repo.path()).assert().code(1);
    let after_batch = repo.remote_commit_count();

    statsync()
        .arg("publish")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to publish"));

    assert_eq!(repo.remote_commit_count(), after_batch);
}

/// Another publisher pushed first; the batch rebases onto it
#[test]
fn test_publish_after_remote_moved() {
    let repo = setup();
    let other = repo.clone_remote("other");
    fs::write(other.join("notes.md"), "pushed elsewhere\n").unwrap();
    run_git(&other, &["add", "notes.md"]);
    run_git(&other, &["commit", "-m", "Concurrent change"]);
    run_git(&other, &["push", "origin", "main"]);
    let before = repo.remote_commit_count();

    statsync()
        .args(["build", "A"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("synced by rebase"));

    assert_eq!(repo.remote_commit_count(), before + 1);
    assert_eq!(repo.remote_head_files(), vec!["out/a.json"]);
    assert!(repo.path().join("notes.md").exists());
    assert_eq!(read(repo.path(), "out/a.json"), "{\"unit\":\"A\",\"mode\":\"--build\"}");
}

/// A stale git index lock from a crashed publisher does not block publishing
#[test]
fn test_stale_index_lock_is_cleared() {
    let repo = setup();
    fs::write(repo.path().join(".git/index.lock"), "").unwrap();

    statsync()
        .args(["update", "C"])
        .current_dir(repo.path())
        .assert()
        .success();

    assert_eq!(repo.remote_head_files(), vec!["out/c.json"]);
    assert!(!repo.path().join(".git/index.lock").exists());
}

/// --no-publish leaves the artifacts in the working copy uncommitted
#[test]
fn test_no_publish_keeps_artifacts_local() {
    let repo = setup();
    let before = repo.remote_commit_count();

    statsync()
        .args(["update", "A", "--no-publish"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Publish: skipped"));

    assert_eq!(repo.remote_commit_count(), before);
    assert!(repo.path().join("out/a.json").exists());

    // A later publish picks them up
    statsync()
        .args(["publish", "-m", "Manual publish"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Published"));

    assert_eq!(repo.remote_head_subject(), "Manual publish");
}

/// --repo points at the working copy from anywhere
#[test]
fn test_repo_flag() {
    let repo = setup();

    statsync()
        .args(["update", "C", "--repo"])
        .arg(repo.path())
        .assert()
        .success();

    assert_eq!(repo.remote_head_files(), vec!["out/c.json"]);
}
