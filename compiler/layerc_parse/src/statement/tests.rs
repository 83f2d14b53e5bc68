use super::*;
use pretty_assertions::assert_eq;

fn texts(source: &str) -> Vec<String> {
    statements(source, 0).map(|s| s.tokens.text()).collect()
}

#[test]
fn splits_at_semicolons() {
    assert_eq!(texts("int a;\nint b;"), vec!["int a;", "\nint b;"]);
}

#[test]
fn splits_declarator_lists_at_commas() {
    assert_eq!(texts("int a, *b;"), vec!["int a, ", "*b;"]);
}

#[test]
fn function_body_ends_statement() {
    assert_eq!(
        texts("int f(void) { return 0; }\nint x;"),
        vec!["int f(void) { return 0; }", "\nint x;"]
    );
}

#[test]
fn record_body_does_not_end_statement() {
    assert_eq!(
        texts("struct s { int a; } v;\n"),
        vec!["struct s { int a; } v;", "\n"]
    );
}

#[test]
fn initializer_body_does_not_end_statement() {
    assert_eq!(texts("int a[] = { 1, 2 };"), vec!["int a[] = { 1, 2 };"]);
}

#[test]
fn directives_are_separate_statements() {
    assert_eq!(
        texts("int a\n#define X 1\nint b;"),
        vec!["int a\n", "#define X 1\n", "int b;"]
    );
}

#[test]
fn leading_comment_stays_with_directive() {
    let all: Vec<Statement> = statements("/* #private */\n#define X 1\n", 0).collect();
    assert_eq!(all.len(), 1);
    assert!(all[0].is(StatementKind::PREPROC));
}

#[test]
fn trailing_comment_is_absorbed() {
    assert_eq!(
        texts("int a; /* one */ // two\nint b;"),
        vec!["int a; /* one */ // two\n", "int b;"]
    );
}

#[test]
fn trailing_comment_stops_at_newline() {
    assert_eq!(texts("int a;\n/* b */ int b;"), vec!["int a;", "\n/* b */ int b;"]);
}

#[test]
fn control_flow_blocks() {
    assert_eq!(
        texts("if (x) { a(); } else { b(); } c();"),
        vec!["if (x) { a(); } ", "else { b(); } ", "c();"]
    );
}

#[test]
fn do_while_is_one_statement() {
    assert_eq!(texts("do { x++; } while (x);"), vec!["do { x++; } while (x);"]);
}

#[test]
fn bare_block() {
    assert_eq!(texts("{ int a; } b;"), vec!["{ int a; } ", "b;"]);
}

#[test]
fn extern_c_block() {
    let all: Vec<Statement> = statements("extern \"C\" { int f(void); }\nint x;", 0).collect();
    assert_eq!(all.len(), 2);
    assert!(all[0].is(StatementKind::EXTERN_C));
}

#[test]
fn annotated_function_definition() {
    assert_eq!(
        texts("static WT_INLINE int f(void) { return 1; } int g;"),
        vec!["static WT_INLINE int f(void) { return 1; } ", "int g;"]
    );
}

#[test]
fn trailing_text_without_terminator() {
    assert_eq!(texts("int a; x"), vec!["int a; ", "x"]);
}

#[test]
fn empty_input() {
    assert!(texts("").is_empty());
}

#[test]
fn statement_spans_are_file_offsets() {
    let group = layerc_lexer::tokenize("xx{ int a;\n}")
        .nth(1)
        .expect("brace group");
    let inner = statements_of(&group.interior().expect("interior"));
    assert_eq!(inner.len(), 2);
    assert_eq!(inner[0].span(), Span::new(3, 10));
}

#[test]
fn terminators() {
    let all: Vec<Statement> = statements("int a, b; f() {}", 0).collect();
    assert_eq!(all[0].terminator(), Some(","));
    assert_eq!(all[1].terminator(), Some(";"));
    assert_eq!(all[2].terminator(), None);
}

#[test]
fn trivia_only_statement_is_empty() {
    let all: Vec<Statement> = statements("int a;\n\n", 0).collect();
    assert!(all[1].is_empty());
    assert_eq!(all[1].kind(), StatementKind::empty());
}

#[test]
fn bare_macro_call_line_ends_statement() {
    assert_eq!(
        texts("WT_DEFINE_THING(x)\nint real_fn(void) { return 0; }\n"),
        vec!["WT_DEFINE_THING(x)\n", "int real_fn(void) { return 0; }", "\n"]
    );
    assert_eq!(
        texts("WT_STAT(a)\nstatic WT_ITEM *item;"),
        vec!["WT_STAT(a)\n", "static WT_ITEM *item;"]
    );
}

#[test]
fn macro_typed_declarator_on_next_line_is_kept() {
    assert_eq!(texts("TAILQ_ENTRY(s)\n    q;"), vec!["TAILQ_ENTRY(s)\n    q;"]);
    assert_eq!(texts("f(x)\n    + 1;"), vec!["f(x)\n    + 1;"]);
}
