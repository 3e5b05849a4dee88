//! CLI integration tests for `zoia prepare` and `zoia rename`
//!
//! These run the real binary against scratch directories.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch workspace with a few library patches and an empty patch
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let lib = dir.path().join("lib");
        fs::create_dir_all(&lib).unwrap();
        for name in ["Delay.bin", "Looper.bin", "Reverb.bin"] {
            fs::write(lib.join(name), name.as_bytes()).unwrap();
        }
        fs::write(dir.path().join("zoia_empty.bin"), b"empty").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn lib(&self, name: &str) -> String {
        self.path("lib").join(name).display().to_string()
    }

    fn zoia(&self) -> Command {
        let mut cmd = Command::cargo_bin("zoia").unwrap();
        cmd.current_dir(self.dir.path())
            .env_remove("ZOIA_SLOTS_FILE")
            .env_remove("ZOIA_EMPTY_PATCH")
            .env_remove("RUST_LOG");
        cmd
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_prepare_copies_into_slots() {
    let ws = Workspace::new();
    let out = ws.path("out");

    ws.zoia()
        .args(["prepare", "-o", "out", "-s", "4"])
        .arg(ws.lib("Looper.bin"))
        .arg(format!("{}:0", ws.lib("Reverb.bin")))
        .assert()
        .success()
        .stdout(predicate::str::contains("4 files copied to out"));

    assert_eq!(
        file_names(&out),
        vec![
            "000_zoia_Reverb.bin",
            "001_zoia_Looper.bin",
            "002_zoia_.bin",
            "003_zoia_.bin",
        ]
    );
    assert_eq!(fs::read(out.join("000_zoia_Reverb.bin")).unwrap(), b"Reverb.bin");
    assert_eq!(fs::read(out.join("003_zoia_.bin")).unwrap(), b"empty");
}

#[test]
fn test_prepare_expands_globs_and_list_files() {
    let ws = Workspace::new();
    let list = ws.path("set.txt");
    fs::write(
        &list,
        format!("{}  # favourite\n\n{}/lib/R*.bin\n", ws.lib("Looper.bin"), ws.dir.path().display()),
    )
    .unwrap();

    ws.zoia()
        .args(["prepare", "-o", "out", "set.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 files copied to out"));

    assert_eq!(
        file_names(&ws.path("out")),
        vec!["000_zoia_Looper.bin", "001_zoia_Reverb.bin"]
    );
}

#[test]
fn test_prepare_reports_every_problem() {
    let ws = Workspace::new();

    ws.zoia()
        .args(["prepare", "-o", "out"])
        .arg(format!("{}:1", ws.lib("Delay.bin")))
        .arg(format!("{}:1", ws.lib("Looper.bin")))
        .arg("notes.md")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR: Not zoia: notes.md"))
        .stderr(predicate::str::contains("ERROR: Slot numbers must be distinct: 1"));

    assert!(!ws.path("out").exists());
}

#[test]
fn test_prepare_glob_with_slot_is_rejected() {
    let ws = Workspace::new();

    ws.zoia()
        .args(["prepare", "-o", "out", "lib/*.bin:2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Globs cannot have slot indexes"));
}

#[test]
fn test_prepare_updates_and_follows_slots_file() {
    let ws = Workspace::new();

    ws.zoia()
        .args(["prepare", "-o", "first", "-u"])
        .arg(ws.lib("Delay.bin"))
        .arg(ws.lib("Looper.bin"))
        .assert()
        .success();

    let slots = fs::read_to_string(ws.path("slots_file.toml")).unwrap();
    assert!(slots.contains("Delay.bin"), "{slots}");
    assert!(slots.contains("Looper.bin"), "{slots}");

    // Reversed input order, but the slots file keeps the old assignment
    ws.zoia()
        .args(["prepare", "-o", "second"])
        .arg(ws.lib("Looper.bin"))
        .arg(ws.lib("Delay.bin"))
        .assert()
        .success();

    assert_eq!(
        file_names(&ws.path("second")),
        vec!["000_zoia_Delay.bin", "001_zoia_Looper.bin"]
    );
}

#[test]
fn test_prepare_json_slots_file() {
    let ws = Workspace::new();
    fs::write(ws.path("slots.json"), r#"{"slots": {"001": ["Delay.bin"]}}"#).unwrap();

    ws.zoia()
        .args(["prepare", "-o", "out", "-f", "slots.json"])
        .arg(ws.lib("Delay.bin"))
        .arg(ws.lib("Reverb.bin"))
        .assert()
        .success();

    assert_eq!(
        file_names(&ws.path("out")),
        vec!["000_zoia_Reverb.bin", "001_zoia_Delay.bin"]
    );
}

#[test]
fn test_prepare_bad_slots_file_names_it() {
    let ws = Workspace::new();
    fs::write(ws.path("slots.toml"), "slots = [").unwrap();

    ws.zoia()
        .args(["prepare", "-o", "out", "-f", "slots.toml"])
        .arg(ws.lib("Delay.bin"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load slots file slots.toml"));
}

#[test]
fn test_prepare_slot_out_of_range() {
    let ws = Workspace::new();

    ws.zoia()
        .args(["prepare", "-o", "out"])
        .arg(format!("{}:18446744073709551615", ws.lib("Delay.bin")))
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR: Bad slot identifier"));

    assert!(!ws.path("out").exists());
}

#[test]
fn test_prepare_dry_run_changes_nothing() {
    let ws = Workspace::new();

    ws.zoia()
        .args(["prepare", "-d", "-u", "-o", "out", "-s", "2"])
        .arg(ws.lib("Delay.bin"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Copying"))
        .stdout(predicate::str::contains("000_zoia_Delay.bin"))
        .stdout(predicate::str::contains("(empty)"));

    assert!(!ws.path("out").exists());
    assert!(!ws.path("slots_file.toml").exists());
}

#[test]
fn test_prepare_missing_empty_patch() {
    let ws = Workspace::new();

    ws.zoia()
        .args(["prepare", "-o", "out", "-s", "3", "--empty-patch", "nope.bin"])
        .arg(ws.lib("Delay.bin"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Empty patch not found"));
}

#[test]
fn test_rename_strips_slot_prefix() {
    let ws = Workspace::new();
    let export = ws.path("export");
    fs::create_dir_all(&export).unwrap();
    fs::write(export.join("012_zoia_Fuzz.bin"), b"fuzz").unwrap();
    fs::write(export.join("Chorus.bin"), b"chorus").unwrap();

    ws.zoia()
        .args(["rename", "export/*.bin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("export/012_zoia_Fuzz.bin -> export/Fuzz.bin"))
        .stdout(predicate::str::contains("1 file renamed"))
        .stderr(predicate::str::contains("Not zoia files"));

    assert_eq!(file_names(&export), vec!["Chorus.bin", "Fuzz.bin"]);
}

#[test]
fn test_rename_refuses_to_overwrite() {
    let ws = Workspace::new();
    fs::write(ws.path("lib/005_zoia_Delay.bin"), b"new delay").unwrap();

    ws.zoia()
        .args(["rename", "lib/005_zoia_Delay.bin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot overwrite"));

    ws.zoia()
        .args(["rename", "-f", "lib/005_zoia_Delay.bin"])
        .assert()
        .success();
    assert_eq!(fs::read(ws.path("lib/Delay.bin")).unwrap(), b"new delay");
}

#[test]
fn test_rename_nothing_to_do() {
    let ws = Workspace::new();

    ws.zoia()
        .args(["rename", "lib/Delay.bin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files to rename"));
}
