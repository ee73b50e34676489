//! # bakefs CLI Integration Tests
//!
//! File: cli/tests/cli.rs
//!
//! ## Overview
//!
//! Runs the compiled `bakefs` binary against temporary directories and
//! checks exit status, output and the resulting filesystem state.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_main_help_flag() {
    bakefs_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mkdir"));
}

#[test]
fn test_main_version_flag() {
    bakefs_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_mkdir_then_ls() {
    let dir = tempdir().unwrap();
    bakefs_cmd()
        .current_dir(dir.path())
        .args(["mkdir", "build/obj/debug"])
        .assert()
        .success();
    assert!(dir.path().join("build/obj/debug").is_dir());

    bakefs_cmd()
        .current_dir(dir.path())
        .args(["ls", "build"])
        .assert()
        .success()
        .stdout("obj\n");
}

#[test]
fn test_cp_file_into_directory() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "alpha").unwrap();
    fs::create_dir(dir.path().join("dst")).unwrap();

    bakefs_cmd()
        .current_dir(dir.path())
        .args(["cp", "a.txt", "dst"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(dir.path().join("dst/a.txt")).unwrap(), "alpha");
}

#[test]
fn test_cp_missing_source_fails() {
    let dir = tempdir().unwrap();
    bakefs_cmd()
        .current_dir(dir.path())
        .args(["cp", "ghost.txt", "out.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("source does not exist"));
}

#[test]
fn test_rm_missing_path_succeeds() {
    let dir = tempdir().unwrap();
    bakefs_cmd()
        .current_dir(dir.path())
        .args(["rm", "not-there"])
        .assert()
        .success();
}

#[test]
fn test_ls_recursive_filter_prints_paths() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("root/keep/drop")).unwrap();
    fs::write(dir.path().join("root/keep/drop/match.txt"), "").unwrap();
    fs::write(dir.path().join("root/skip.md"), "").unwrap();

    bakefs_cmd()
        .current_dir(dir.path())
        .args(["ls", "root", "--filter", "**/*.txt"])
        .assert()
        .success()
        .stdout("root/keep/drop/match.txt\n");
}

#[test]
fn test_ls_bad_filter_fails() {
    let dir = tempdir().unwrap();
    bakefs_cmd()
        .current_dir(dir.path())
        .args(["ls", ".", "--filter", "[oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot compile filter"));
}

#[cfg(unix)]
#[test]
fn test_ln_and_stat() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("lib.so"), "elf").unwrap();

    bakefs_cmd()
        .current_dir(dir.path())
        .args(["ln", "lib.so", "dist/lib.so"])
        .assert()
        .success();
    let link = dir.path().join("dist/lib.so");
    assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
    assert!(fs::read_link(&link).unwrap().is_absolute());

    bakefs_cmd()
        .current_dir(dir.path())
        .args(["stat", "dist/lib.so"])
        .assert()
        .success()
        .stdout(predicate::str::contains("symlink").and(predicate::str::contains("mode:")));
}

#[cfg(unix)]
#[test]
fn test_project_config_sets_dir_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".bakefs.toml"), "[fs]\ndir_mode = \"700\"\n").unwrap();

    bakefs_cmd()
        .current_dir(dir.path())
        .args(["mkdir", "private"])
        .assert()
        .success();
    let mode = fs::metadata(dir.path().join("private")).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o700);
}

#[test]
fn test_invalid_project_config_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".bakefs.toml"), "[logging]\nlevel = \"loud\"\n").unwrap();

    bakefs_cmd()
        .current_dir(dir.path())
        .args(["ls"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid logging level"));
}
