use super::*;
use pretty_assertions::assert_eq;

fn file(text: &str) -> Arc<FileInfo> {
    Arc::new(FileInfo::new("src/foo/a.c", "foo", 2, text))
}

#[test]
fn line_and_column() {
    let info = file("ab\ncd\n\nx");
    assert_eq!(info.line_col(0), (1, 1));
    assert_eq!(info.line_col(1), (1, 2));
    assert_eq!(info.line_col(3), (2, 1));
    assert_eq!(info.line_col(6), (3, 1));
    assert_eq!(info.line_col(7), (4, 1));
}

#[test]
fn location_strings() {
    let scope = Scope::new(file("int a;\nint b;\n"));
    assert_eq!(scope.location(11), "src/foo/a.c:2:5");
}

#[test]
fn out_of_range_offsets_use_the_fragment_start() {
    let mut scope = Scope::new(file("x\nextern \"C\" {\n}\n"));
    scope.nested.push(13);
    assert_eq!(scope.location(500), "src/foo/a.c:2:12");
    assert_eq!(scope.to_string(), "src/foo/a.c > 2:12");
}

#[test]
fn nested_contexts_do_not_share_the_stack() {
    let config = Arc::new(ModuleConfig::default());
    let ctx = ScanContext::new(file("text"), DiagnosticSink::default(), config);
    let inner = ctx.nested(2);
    let innermost = inner.nested(3);
    assert!(ctx.scope.nested.is_empty());
    assert_eq!(inner.scope.nested, vec![2]);
    assert_eq!(innermost.scope.nested, vec![2, 3]);
    assert_eq!(innermost.module(), "foo");
}

#[test]
fn for_file_assigns_module_and_priority() {
    let config = Arc::new(
        ModuleConfig::new("/proj").with_module(crate::Module::new("foo")),
    );
    let ctx = ScanContext::for_file(
        Path::new("/proj/src/foo/x.h"),
        "",
        DiagnosticSink::default(),
        config,
    );
    assert_eq!(ctx.module(), "foo");
    assert_eq!(ctx.scope.file.priority, 1);
}
