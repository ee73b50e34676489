//! # bakefs Library Behavior Tests
//!
//! File: cli/tests/fs_properties.rs
//!
//! ## Overview
//!
//! Exercises the public `bakefs` API the way a build step would: operations
//! are repeated, run against partially existing trees, and chained, and the
//! resulting filesystem state is checked directly with `std::fs`.
//!

mod common;
use common::path_str;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_mkdir_is_idempotent_and_creates_parents() {
    let dir = tempdir().unwrap();
    let target = path_str(dir.path(), "a/b/c");

    bakefs::mkdir(&target).unwrap();
    bakefs::mkdir(&target).unwrap();

    assert!(dir.path().join("a").is_dir());
    assert!(dir.path().join("a/b").is_dir());
    assert!(dir.path().join("a/b/c").is_dir());
}

#[test]
fn test_mkdir_replaces_file_in_the_way() {
    let dir = tempdir().unwrap();
    let target = path_str(dir.path(), "out");
    fs::write(&target, "stale").unwrap();

    bakefs::mkdir(&target).unwrap();
    assert!(bakefs::is_directory(&target));
}

#[test]
fn test_remove_is_idempotent() {
    let dir = tempdir().unwrap();
    let tree = path_str(dir.path(), "build");
    fs::create_dir_all(dir.path().join("build/obj/.cache")).unwrap();
    fs::write(dir.path().join("build/obj/.cache/x"), "x").unwrap();
    fs::write(dir.path().join("build/app"), "bin").unwrap();

    bakefs::remove(&tree).unwrap();
    assert!(!bakefs::exists(&tree));
    bakefs::remove(&tree).unwrap();
}

#[test]
fn test_copy_file_creates_parent_and_keeps_mode() {
    let dir = tempdir().unwrap();
    let src = path_str(dir.path(), "src.txt");
    let dst = path_str(dir.path(), "x/y/src.txt");
    fs::write(&src, "payload").unwrap();
    bakefs::set_permissions(&src, 0o644).unwrap();

    bakefs::copy(&src, &dst).unwrap();

    assert_eq!(fs::read_to_string(&dst).unwrap(), "payload");
    #[cfg(unix)]
    assert_eq!(bakefs::get_permissions(&dst).unwrap(), 0o644);
}

#[test]
fn test_copy_file_into_existing_directory_uses_basename() {
    let dir = tempdir().unwrap();
    let src = path_str(dir.path(), "a.txt");
    let dst = path_str(dir.path(), "dst");
    fs::write(&src, "a").unwrap();
    fs::create_dir(&dst).unwrap();

    bakefs::copy(&src, &dst).unwrap();
    assert_eq!(fs::read_to_string(dir.path().join("dst/a.txt")).unwrap(), "a");
}

#[test]
fn test_copy_onto_itself_is_a_no_op() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("d")).unwrap();
    let file = path_str(dir.path(), "d/a.txt");
    fs::write(&file, "precious").unwrap();

    bakefs::copy(&file, &path_str(dir.path(), "d")).unwrap();
    bakefs::copy(&file, &file).unwrap();
    assert_eq!(fs::read_to_string(&file).unwrap(), "precious");
}

#[test]
fn test_copy_directory_tree() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("tpl/etc")).unwrap();
    fs::write(dir.path().join("tpl/etc/app.conf"), "port=1").unwrap();
    fs::write(dir.path().join("tpl/README"), "readme").unwrap();

    bakefs::copy(&path_str(dir.path(), "tpl"), &path_str(dir.path(), "out/tpl")).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("out/tpl/etc/app.conf")).unwrap(),
        "port=1"
    );
    assert!(dir.path().join("out/tpl/README").is_file());
}

#[test]
fn test_copy_missing_source_is_not_found() {
    let dir = tempdir().unwrap();
    let err = bakefs::copy(&path_str(dir.path(), "ghost"), &path_str(dir.path(), "out"))
        .unwrap_err();
    assert_eq!(err.kind(), bakefs::ErrorKind::NotFound);
}

#[test]
fn test_copy_expands_environment() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("in.txt"), "env").unwrap();
    std::env::set_var("BAKEFS_TEST_COPY_ROOT", dir.path());

    bakefs::copy("$BAKEFS_TEST_COPY_ROOT/in.txt", "${BAKEFS_TEST_COPY_ROOT}/out.txt").unwrap();
    assert!(dir.path().join("out.txt").is_file());
}

#[cfg(unix)]
#[test]
fn test_symlink_is_idempotent_and_retargets() {
    let dir = tempdir().unwrap();
    let first = path_str(dir.path(), "v1");
    let second = path_str(dir.path(), "v2");
    let link = path_str(dir.path(), "links/current");
    fs::write(&first, "1").unwrap();
    fs::write(&second, "2").unwrap();

    bakefs::symlink(&first, &link).unwrap();
    bakefs::symlink(&first, &link).unwrap();
    assert_eq!(fs::read_to_string(&link).unwrap(), "1");

    bakefs::symlink(&second, &link).unwrap();
    assert_eq!(fs::read_to_string(&link).unwrap(), "2");
    assert!(bakefs::is_symlink(&link));
}

#[test]
fn test_recursive_filter_descends_into_non_matching_dirs() {
    let dir = tempdir().unwrap();
    let root = path_str(dir.path(), "root");
    fs::create_dir_all(dir.path().join("root/keep/drop")).unwrap();
    fs::write(dir.path().join("root/keep/drop/match.txt"), "").unwrap();
    fs::write(dir.path().join("root/keep/other.md"), "").unwrap();

    let found: Vec<String> = bakefs::open_dir_iter(Some(&root), Some("//*.txt"))
        .unwrap()
        .collect();
    assert_eq!(found, vec![format!("{}/keep/drop/match.txt", root)]);
}

#[cfg(unix)]
#[test]
fn test_recursive_filter_ignores_link_back_to_root() {
    let dir = tempdir().unwrap();
    let root = path_str(dir.path(), "root");
    fs::create_dir(&root).unwrap();
    fs::write(dir.path().join("root/a.txt"), "").unwrap();
    std::os::unix::fs::symlink(".", dir.path().join("root/self")).unwrap();

    let found: Vec<String> = bakefs::open_dir_iter(Some(&root), Some("//*.txt"))
        .unwrap()
        .collect();
    assert_eq!(found, vec![format!("{}/a.txt", root)]);
}

#[test]
fn test_flat_filter_yields_names() {
    let dir = tempdir().unwrap();
    let root = path_str(dir.path(), "src");
    fs::create_dir(&root).unwrap();
    for name in ["main.c", "util.h", "notes.txt"] {
        fs::write(dir.path().join("src").join(name), "").unwrap();
    }

    let mut found: Vec<String> = bakefs::open_dir_iter(Some(&root), Some("*.c|*.h"))
        .unwrap()
        .collect();
    found.sort();
    assert_eq!(found, vec!["main.c".to_string(), "util.h".to_string()]);
}

#[test]
fn test_rename_then_list() {
    let dir = tempdir().unwrap();
    let root = path_str(dir.path(), "d");
    fs::create_dir(&root).unwrap();
    fs::write(dir.path().join("d/old"), "").unwrap();

    bakefs::rename(&path_str(dir.path(), "d/old"), &path_str(dir.path(), "d/new")).unwrap();
    assert_eq!(bakefs::list_dir(&root).unwrap(), vec!["new".to_string()]);
}

#[test]
fn test_missing_directory_iter_is_not_found() {
    let dir = tempdir().unwrap();
    let err = bakefs::open_dir_iter(Some(&path_str(dir.path(), "nope")), None).unwrap_err();
    assert_eq!(err.kind(), bakefs::ErrorKind::NotFound);
}
