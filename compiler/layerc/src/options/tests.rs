use super::*;
use pretty_assertions::assert_eq;

fn parse(args: &[&str]) -> Result<CheckOptions, UsageError> {
    let args: Vec<String> = args.iter().map(|a| (*a).to_owned()).collect();
    parse_check_options(&args)
}

#[test]
fn root_only() {
    let options = parse(&["proj"]).unwrap();
    assert_eq!(options.root, PathBuf::from("proj"));
    assert!(options.parallel);
    assert!(options.modules.is_empty());
}

#[test]
fn all_flags() {
    let options = parse(&[
        "--module=btree",
        "--module=cache:block_cache",
        "--extra-file=src/include/extra.h",
        "--define=N=4",
        "--define=F(a)=a",
        "--no-parallel",
        "--threads=3",
        "--cache",
        "--clear-cache",
        "--warn-module-mismatch",
        "-v",
        "/src/tree",
    ])
    .unwrap();
    assert_eq!(
        options.modules,
        vec![Module::new("btree"), Module::with_dir("cache", "block_cache")]
    );
    assert_eq!(options.extra_files, vec![PathBuf::from("src/include/extra.h")]);
    assert_eq!(
        options.extra_macros,
        vec![ExtraMacro::object("N", "4"), ExtraMacro::function("F", &["a"], "a")]
    );
    assert!(!options.parallel);
    assert_eq!(options.threads, 3);
    assert!(options.cache && options.clear_cache && options.warn_module_mismatch && options.verbose);
    assert_eq!(options.root, PathBuf::from("/src/tree"));
}

#[test]
fn usage_errors() {
    assert_eq!(parse(&[]), Err(UsageError::MissingRoot));
    assert_eq!(parse(&["a", "b"]), Err(UsageError::UnexpectedArgument("b".into())));
    assert_eq!(parse(&["--bogus", "a"]), Err(UsageError::UnknownOption("--bogus".into())));
    assert_eq!(
        parse(&["--threads=many", "a"]),
        Err(UsageError::InvalidValue { option: "--threads", value: "many".into() })
    );
    assert_eq!(
        parse(&["--module=:dir", "a"]),
        Err(UsageError::InvalidValue { option: "--module", value: ":dir".into() })
    );
    assert!(parse(&["--define=9x", "a"]).is_err());
}
