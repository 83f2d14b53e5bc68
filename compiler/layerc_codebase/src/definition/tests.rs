use std::sync::Arc;

use super::*;
use crate::FileInfo;
use layerc_parse::statements;
use pretty_assertions::assert_eq;

fn scope(path: &str, priority: u8) -> Scope {
    Scope::new(Arc::new(FileInfo::new(path, "foo", priority, "")))
}

fn function(text: &str) -> FunctionParts {
    let statement = statements(text, 0).next().expect("statement");
    FunctionParts::from_statement(&statement).expect("function")
}

fn def(text: &str, priority: u8, is_private: Option<bool>) -> Definition {
    let func = function(text);
    let name = func.name.text.clone();
    Definition::new(
        name,
        scope("a.c", priority),
        0,
        Visibility { is_private, module: "foo".into() },
        Details::Function(func),
    )
}

#[test]
fn priority_ordering() {
    let proto = def("void f(int);", 2, Some(true));
    let body = def("void f(int x) { }", 0, None);
    assert_eq!(proto.priority(), 12);
    assert_eq!(body.priority(), 100);
}

#[test]
fn body_wins_in_either_order() {
    let sink = DiagnosticSink::default();
    let mut first = def("void f(int);", 1, None);
    first.update(def("void f(int x) { return; }", 2, None), &sink);
    assert!(first.details.has_body());
    assert_eq!(first.scope.file.priority, 2);

    let mut second = def("void f(int x) { return; }", 2, None);
    second.update(def("void f(int);", 1, None), &sink);
    assert!(second.details.has_body());
    assert_eq!(sink.warning_count(), 0);
}

#[test]
fn privacy_is_or_merged() {
    let sink = DiagnosticSink::default();
    let mut public = def("void f(void) { }", 2, Some(false));
    public.update(def("void f(void);", 1, Some(true)), &sink);
    assert_eq!(public.is_private, Some(true));

    let mut unset = def("void f(void);", 1, None);
    unset.update(def("void f(void);", 1, Some(false)), &sink);
    assert_eq!(unset.is_private, Some(false));
}

#[test]
fn mismatched_signatures_are_reported() {
    let sink = DiagnosticSink::default();
    let mut mine = def("int f(int a) { }", 2, None);
    mine.update(def("int f(long a);", 1, None), &sink);
    let warnings = sink.take_sorted();
    assert_eq!(warnings[0].kind, WarningKind::DETAILS_MISMATCH);
    assert_eq!(warnings[0].message, "conflicting update for details:");
    assert_eq!(warnings[2].message, "function args mismatch for f: (int) != (long)");
}

#[test]
fn module_mismatch_is_reported() {
    let sink = DiagnosticSink::default();
    let mut mine = def("void f(void);", 1, None);
    let mut theirs = def("void f(void);", 1, None);
    theirs.module = "bar".into();
    mine.update(theirs, &sink);
    let warnings = sink.take_sorted();
    assert_eq!(warnings.len(), 5);
    assert_eq!(warnings[0].kind, WarningKind::MODULE_MISMATCH);
    assert_eq!(warnings[0].location.as_deref(), Some("a.c:1:1 function [foo] 'f':"));
    assert_eq!(warnings[2].message, "module mismatch for function 'f': foo != bar");
}

#[test]
fn kind_mismatch_keeps_the_winner() {
    let sink = DiagnosticSink::default();
    let var = layerc_parse::Variable::from_var_def(&statements("int f;", 0).next().expect("st").tokens)
        .expect("variable");
    let field = Definition::new(
        "f",
        scope("a.c", 2),
        0,
        Visibility::default(),
        Details::Field(var),
    );
    let mut func = def("void f(void) { }", 0, None);
    func.update(field, &sink);
    assert_eq!(func.kind(), DefinitionKind::Function);
    assert_eq!(sink.take_sorted()[0].kind, WarningKind::KIND_MISMATCH);
}

#[test]
fn comments_are_concatenated_in_sighting_order() {
    let sink = DiagnosticSink::default();
    let mut first = def("/* one */ void f(void);", 0, None);
    first.update(def("/* two */ void f(void) { }", 0, None), &sink);
    let texts: Vec<&str> = first.pre_comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["/* one */", "/* two */"]);
}
