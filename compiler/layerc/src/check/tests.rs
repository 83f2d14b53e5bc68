use std::fs;

use super::*;
use pretty_assertions::assert_eq;

fn options(root: &Path) -> CheckOptions {
    CheckOptions {
        root: root.to_path_buf(),
        parallel: false,
        ..CheckOptions::default()
    }
}

#[test]
fn modules_default_to_source_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    for sub in ["src/os_posix", "src/btree", "src/include"] {
        fs::create_dir_all(dir.path().join(sub)).expect("mkdir");
    }
    fs::write(dir.path().join("src/loose.c"), "").expect("write");

    let config = module_config(&options(dir.path())).expect("config");
    let names: Vec<_> = config.modules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["btree", "include", "os_posix"]);
}

#[test]
fn explicit_modules_are_kept() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut opts = options(dir.path());
    opts.modules.push(Module::with_dir("cache", "block_cache"));
    let config = module_config(&opts).expect("config");
    assert_eq!(config.modules, vec![Module::with_dir("cache", "block_cache")]);
}

#[test]
fn summary_counts() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("src/foo")).expect("mkdir");
    fs::write(
        dir.path().join("src/foo/foo.c"),
        "#define N 1\ntypedef int count_t;\nstruct __wt_foo { int a; int b; };\nint foo_get(void) { return N; }\n",
    )
    .expect("write");

    let report = run_check(&options(dir.path())).expect("check");
    assert_eq!(report.exit_code(), exit::OK);

    let mut out = Vec::new();
    print_report(&report, true, &mut out).expect("print");
    let text = String::from_utf8(out).expect("utf8");
    assert_eq!(
        text,
        "module foo: 3 public, 1 private\n\
         scanned 1 files: 1 types, 1 functions, 2 fields, 1 typedefs, 1 macros\n\
         0 errors, 0 diagnostics\n"
    );
}
