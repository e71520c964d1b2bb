use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tempfile::tempdir;

fn saveplus(scratch: &Path) -> Command {
    let mut cmd = Command::cargo_bin("saveplus").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd.args([
        "--config",
        scratch.join("prefs.json").to_str().unwrap(),
        "--history",
        scratch.join("history.json").to_str().unwrap(),
    ]);
    cmd
}

#[test]
fn next_prints_incremented_name() {
    let dir = tempdir().unwrap();
    saveplus(dir.path())
        .args(["next", "filename", "--format", "mb", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout("filename02.mb\n");
}

#[test]
fn next_skips_collisions() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("scene02.ma")).unwrap();
    saveplus(dir.path())
        .args(["next", "scene01.ma", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout("scene03.ma\n");
}

#[test]
fn save_then_history() {
    let dir = tempdir().unwrap();
    let scene = dir.path().join("shot01.ma");
    fs::write(&scene, "scene").unwrap();

    saveplus(dir.path())
        .arg("save")
        .arg(&scene)
        .args(["--note", "first pass"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shot02.ma"));
    assert!(dir.path().join("shot02.ma").exists());

    saveplus(dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("shot02.ma").and(predicate::str::contains("first pass")));
}

#[test]
fn generate_remembers_fields() {
    let dir = tempdir().unwrap();
    saveplus(dir.path())
        .args([
            "generate", "--letter", "j", "--number", "2", "--last", "Smith", "--first", "John",
            "--stage", "layout",
        ])
        .assert()
        .success()
        .stdout("J02_Smith_John_layout_wip_01\n");

    saveplus(dir.path())
        .args(["generate", "--version", "3"])
        .assert()
        .success()
        .stdout("J02_Smith_John_layout_wip_03\n");
}

#[test]
fn empty_name_errors() {
    let dir = tempdir().unwrap();
    saveplus(dir.path())
        .args(["next", "", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn backup_of_unsaved_scene_fails() {
    let dir = tempdir().unwrap();
    saveplus(dir.path())
        .arg("backup")
        .arg(dir.path().join("missing.ma"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be saved"));
}
