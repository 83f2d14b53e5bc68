//! `layerc check` over small on-disk projects.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use layerc::{exit, parse_check_options, print_report, run_check, CheckOptions};
use pretty_assertions::assert_eq;

fn write(root: &Path, name: &str, text: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn check(args: &[&str]) -> (i32, String) {
    let args: Vec<String> = args.iter().map(|a| (*a).to_owned()).collect();
    let options: CheckOptions = parse_check_options(&args).unwrap();
    let report = run_check(&options).unwrap();
    let mut out = Vec::new();
    print_report(&report, options.verbose, &mut out).unwrap();
    (report.exit_code(), String::from_utf8(out).unwrap())
}

#[test]
fn clean_project_exits_ok() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/foo/foo.c", "struct __wt_foo { int x; };\n");
    write(dir.path(), "src/bar/bar.c", "int bar_get(struct __wt_foo *f) { return f->x; }\n");
    let root = dir.path().to_str().unwrap();

    let (code, text) = check(&[root, "--no-parallel"]);
    assert_eq!(code, exit::OK);
    assert!(text.contains("scanned 2 files: 1 types, 1 functions, 1 fields"), "{text}");
}

#[test]
fn ambiguous_annotation_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "src/foo/foo.c",
        "/* #private(bar) */\nstruct __wt_foo_state { int x; };\n",
    );
    write(dir.path(), "src/bar/bar.c", "");
    let root = dir.path().to_str().unwrap();

    let (code, text) = check(&[root]);
    assert_eq!(code, exit::OK);
    assert!(
        text.contains("'__wt_foo_state' is annotated for module 'bar' but its name implies module 'foo'"),
        "{text}"
    );
    assert!(text.contains("0 errors, 1 diagnostics"), "{text}");
}

#[test]
fn unreadable_extra_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/foo/foo.c", "void f(void) { }\n");
    let root = dir.path().to_str().unwrap();

    let (code, text) = check(&[root, "--extra-file=src/include/missing.h"]);
    assert_eq!(code, exit::ERRORS);
    assert!(text.contains("cannot read "), "{text}");
    assert!(text.contains("1 errors"), "{text}");
}

#[test]
fn missing_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let options = CheckOptions {
        root: dir.path().join("nowhere"),
        ..CheckOptions::default()
    };
    assert!(run_check(&options).is_err());
}

#[test]
fn cache_round_trip_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/foo/foo.c", "#define N 2\nint foo(void) { return N; }\n");
    let root = dir.path().to_str().unwrap();

    let (_, first) = check(&[root, "--cache"]);
    assert!(dir.path().join("build/.parsecache").exists());
    let (_, second) = check(&[root, "--cache"]);
    assert_eq!(first, second);

    let (_, third) = check(&[root, "--clear-cache", "--define=N=3"]);
    assert_eq!(first, third);
    assert!(!dir.path().join("build/.parsecache").exists());
}
