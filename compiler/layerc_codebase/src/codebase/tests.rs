use super::*;
use crate::{FileInfo, Module};
use layerc_diagnostic::WarningKind;
use pretty_assertions::assert_eq;

fn config() -> Arc<ModuleConfig> {
    Arc::new(
        ModuleConfig::new("/proj")
            .with_module(Module::new("foo"))
            .with_module(Module::new("bar")),
    )
}

fn ctx_for(path: &str, module: &str, priority: u8, text: &str, sink: &DiagnosticSink) -> ScanContext {
    let file = FileInfo::new(path, module, priority, text);
    ScanContext::new(Arc::new(file), sink.clone(), config())
}

fn scan(text: &str) -> (Codebase, DiagnosticSink) {
    let sink = DiagnosticSink::default();
    let ctx = ctx_for("src/foo/a.c", "foo", 2, text, &sink);
    let mut codebase = Codebase::new();
    codebase.update_from_text(text, 0, &ctx);
    (codebase, sink)
}

#[test]
fn functions_and_prototypes() {
    let (codebase, _) = scan("static int helper(int a);\nint helper(int a) { return a; }\n");
    let def = codebase.get_name("helper").expect("helper");
    assert_eq!(def.kind(), crate::DefinitionKind::Function);
    assert!(def.details.has_body());
    assert_eq!(def.module, "foo");
    assert_eq!(def.location(), "src/foo/a.c:2:5");
}

#[test]
fn annotated_functions_are_restricted() {
    let (codebase, _) = scan("/* #private */\nvoid f(void) { }\nvoid g(void) { } /* #public */\n");
    assert!(codebase.is_restricted_name("f"));
    assert!(!codebase.is_restricted_name("g"));
    assert_eq!(codebase.get_name("g").and_then(|d| d.is_private), Some(false));
}

#[test]
fn records_and_fields() {
    let (codebase, _) = scan("struct __wt_foo {\n    int x;\n    char *__wt_name;\n};\n");
    let record = codebase.get_type("__wt_foo").expect("record");
    assert_eq!(record.is_private, Some(true));
    assert_eq!(record.module, "foo");
    assert!(codebase.is_restricted_type("__wt_foo"));

    let x = codebase.get_field("__wt_foo", "x").expect("x");
    assert_eq!(x.is_private, None);
    assert_eq!(x.module, "foo");
    let name = codebase.get_field("__wt_foo", "__wt_name").expect("name");
    assert_eq!(name.is_private, Some(true));
}

#[test]
fn naming_module_tag_overrides_file_module() {
    let (codebase, _) = scan("struct __wt_bar_state { int n; };\n");
    assert_eq!(codebase.get_type("__wt_bar_state").map(|d| d.module.as_str()), Some("bar"));
}

#[test]
fn nested_records_are_flattened() {
    let text = "struct outer {\n    struct inner { int a; } in;\n    union { int b; long c; };\n};\n";
    let (codebase, _) = scan(text);
    assert!(codebase.get_type("outer").is_some());
    assert!(codebase.get_type("inner").is_some());
    assert!(codebase.get_field("inner", "a").is_some());
    assert!(codebase.get_field("outer", "in").is_some());
    assert!(codebase.get_field("outer", "b").is_some());
    assert!(codebase.get_field("outer", "c").is_some());
}

#[test]
fn typedef_chains() {
    let (codebase, _) = scan("typedef struct foo BAR;\ntypedef BAR BAZ;\nstruct foo { int x; };\n");
    assert_eq!(codebase.typedefs.get("BAR").map(String::as_str), Some("foo"));
    assert_eq!(codebase.typedefs.get("BAZ").map(String::as_str), Some("BAR"));
    assert_eq!(codebase.untypedef("BAZ"), "foo");
    assert_eq!(codebase.untypedef("unknown"), "unknown");
}

#[test]
fn typedef_declarator_lists() {
    let (codebase, _) = scan("typedef unsigned int u32, *u32p;\ntypedef struct s { int a; } s_t, *s_p;\n");
    assert_eq!(codebase.typedefs.get("u32").map(String::as_str), Some("int"));
    assert_eq!(codebase.typedefs.get("u32p").map(String::as_str), Some("int"));
    assert_eq!(codebase.typedefs.get("s_t").map(String::as_str), Some("s"));
    assert_eq!(codebase.typedefs.get("s_p").map(String::as_str), Some("s"));
}

#[test]
fn anonymous_typedef_record_takes_its_name() {
    let (codebase, _) = scan("typedef struct { int a; } point_t;\n");
    assert!(codebase.get_type("point_t").is_some());
    assert!(codebase.get_field("point_t", "a").is_some());
    assert!(!codebase.typedefs.contains_key("point_t"));
}

#[test]
fn typedef_cycles_terminate() {
    let mut codebase = Codebase::new();
    codebase.typedefs.insert("A".into(), "B".into());
    codebase.typedefs.insert("B".into(), "A".into());
    assert_eq!(codebase.untypedef("A"), "A");
}

#[test]
fn untypedef_prefers_known_records() {
    let mut codebase = Codebase::new();
    let (records, _) = scan("struct rec { int a; };\n");
    codebase.types = records.types;
    codebase.typedefs.insert("T".into(), "rec".into());
    codebase.typedefs.insert("rec".into(), "other".into());
    assert_eq!(codebase.untypedef("T"), "rec");
}

#[test]
fn field_types_resolve_through_typedefs() {
    let text = "typedef struct inner INNER;\nstruct inner { int v; };\nstruct outer { INNER *p; };\ntypedef struct outer OUTER;\n";
    let (codebase, _) = scan(text);
    assert_eq!(codebase.get_field_type("outer", "p").as_deref(), Some("inner"));
    assert_eq!(codebase.get_field_type("OUTER", "p").as_deref(), Some("inner"));
    assert_eq!(codebase.get_field_type("outer", "missing"), None);
}

#[test]
fn macros_are_registered() {
    let (codebase, _) = scan("#define N 4\n#define SQ(x) ((x) * (x))\nint n = N;\n");
    assert!(codebase.macros.contains("N"));
    assert_eq!(codebase.macros.expand("SQ(N)").text, "((4) * (4))");
}

#[test]
fn extern_c_blocks_are_unwrapped() {
    let text = "extern \"C\" {\nstruct ext { int a; };\nvoid api(void) { }\n}\n";
    let (codebase, _) = scan(text);
    let record = codebase.get_type("ext").expect("record");
    assert_eq!(record.location(), "src/foo/a.c:2:8");
    assert_eq!(record.scope.nested, vec![12]);
    assert!(codebase.get_name("api").is_some());
}

#[test]
fn merge_keeps_body_and_reports_conflicts() {
    let sink = DiagnosticSink::default();
    let header = "int f(int a);\n";
    let source = "int f(int a) { return a; }\n";

    let mut first = Codebase::new();
    first.update_from_text(header, 0, &ctx_for("src/foo/f.h", "foo", 1, header, &sink));
    let mut second = Codebase::new();
    second.update_from_text(source, 0, &ctx_for("src/foo/f.c", "foo", 2, source, &sink));
    first.merge(second, &sink);

    let def = first.get_name("f").expect("f");
    assert!(def.details.has_body());
    assert_eq!(def.scope.file.path, "src/foo/f.c");
    assert_eq!(sink.warning_count(), 0);
}

#[test]
fn merge_or_merges_privacy() {
    let sink = DiagnosticSink::default();
    let a = "/* #private */ int f(void);\n";
    let b = "int f(void) { return 0; }\n";
    let mut first = Codebase::new();
    first.update_from_text(a, 0, &ctx_for("src/foo/f.h", "foo", 1, a, &sink));
    let mut second = Codebase::new();
    second.update_from_text(b, 0, &ctx_for("src/foo/f.c", "foo", 2, b, &sink));
    first.merge(second, &sink);
    assert!(first.is_restricted_name("f"));
    assert_eq!(first.get_name("f").and_then(|d| d.is_private), Some(true));
}

#[test]
fn merge_reports_module_mismatch() {
    let sink = DiagnosticSink::default();
    let text = "void f(void) { }\n";
    let mut first = Codebase::new();
    first.update_from_text(text, 0, &ctx_for("src/foo/f.c", "foo", 2, text, &sink));
    let mut second = Codebase::new();
    second.update_from_text(text, 0, &ctx_for("src/bar/f.c", "bar", 2, text, &sink));
    first.merge(second, &sink);
    let warnings = sink.take_sorted();
    assert!(warnings.iter().any(|w| w.kind == WarningKind::MODULE_MISMATCH));
    assert_eq!(first.get_name("f").map(|d| d.module.as_str()), Some("foo"));
}

#[test]
fn first_typedef_wins_on_merge() {
    let sink = DiagnosticSink::default();
    let mut first = Codebase::new();
    first.typedefs.insert("T".into(), "a".into());
    let mut second = Codebase::new();
    second.typedefs.insert("T".into(), "b".into());
    second.typedefs.insert("U".into(), "c".into());
    first.merge(second, &sink);
    assert_eq!(first.typedefs.get("T").map(String::as_str), Some("a"));
    assert_eq!(first.typedefs.get("U").map(String::as_str), Some("c"));
}

#[test]
fn expressions_are_ignored() {
    let (codebase, sink) = scan("x = y + 1;\nif (x) { f(); }\n");
    assert_eq!(codebase.definition_count(), 0);
    assert_eq!(sink.warning_count(), 0);
}

#[test]
fn macro_typed_and_pointer_members() {
    let (codebase, _) = scan(
        "struct __wt_q {\n    TAILQ_ENTRY(__wt_q) q;\n    int (*open)(int, char *);\n    uint8_t buf[16];\n    unsigned x : 3, y : 4;\n};\n",
    );
    let mut fields: Vec<&str> = codebase.fields["__wt_q"].keys().map(String::as_str).collect();
    fields.sort_unstable();
    assert_eq!(fields, ["buf", "open", "q", "x", "y"]);
    assert_eq!(codebase.get_field_type("__wt_q", "q").as_deref(), Some("TAILQ_ENTRY"));
    assert_eq!(codebase.get_field_type("__wt_q", "y").as_deref(), Some("unsigned"));
}

#[test]
fn macro_call_before_function() {
    let (codebase, _) = scan("WT_DEFINE_THING(x)\nint real_fn(void) { return 0; }\n");
    assert!(codebase.get_name("real_fn").is_some_and(|d| d.details.has_body()));
    assert!(codebase.get_name("WT_DEFINE_THING").is_none());
}

#[test]
fn expansion_errors_reach_the_sink() {
    let text = "#define PAIR(a, b) a + b\n#define ONE 1\nint f(void) { return PAIR(ONE) + ONE; }\n";
    let (codebase, sink) = scan(text);
    let ctx = ctx_for("src/foo/a.c", "foo", 2, text, &sink);
    let body = "return PAIR(ONE) + ONE;";
    let offset = text.find(body).expect("body");

    let expanded = codebase.expand_macros(body, offset, &ctx);
    assert_eq!(expanded, "return PAIR(ONE) + 1;");
    assert_eq!(sink.error_count(), 1);
    let warnings = sink.take_sorted();
    assert_eq!(warnings[0].kind, WarningKind::MACRO_EXPANSION);
    assert_eq!(warnings[0].location.as_deref(), Some("src/foo/a.c:3:15"));
    assert_eq!(warnings[0].message, "macro PAIR: got only 1 arguments, expected 2");
}
