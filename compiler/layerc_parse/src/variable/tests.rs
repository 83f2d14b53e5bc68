use super::*;
use crate::statement::statements;
use layerc_lexer::tokenize;
use pretty_assertions::assert_eq;

fn var(source: &str) -> Option<Variable> {
    Variable::from_var_def(&tokenize(source).collect())
}

fn summary(v: &Variable) -> (String, String, String) {
    (v.typename.short_repr(), v.name.text.clone(), v.end.clone())
}

#[test]
fn plain_declaration() {
    let v = var("int x;").expect("variable");
    assert_eq!(summary(&v), ("int".into(), "x".into(), ";".into()));
}

#[test]
fn qualifiers_are_dropped() {
    let v = var("static const struct foo *p;").expect("variable");
    assert_eq!(v.typename.short_repr(), "struct foo *");
    assert_eq!(v.base_type(), "foo");
}

#[test]
fn array_and_initializer() {
    let v = var("char buf[16] = { 0 },").expect("variable");
    assert_eq!(summary(&v), ("char".into(), "buf".into(), ",".into()));
}

#[test]
fn bitfield() {
    let v = var("unsigned int flag : 1;").expect("variable");
    assert_eq!(summary(&v), ("unsigned int".into(), "flag".into(), ";".into()));
}

#[test]
fn function_pointer() {
    let v = var("int (*cb)(WT_SESSION *, int);").expect("variable");
    assert_eq!(summary(&v), ("int".into(), "cb".into(), ";".into()));
}

#[test]
fn macro_typed_member() {
    let v = var("TAILQ_ENTRY(__wt_q) q;").expect("variable");
    assert_eq!(summary(&v), ("TAILQ_ENTRY (__wt_q)".into(), "q".into(), ";".into()));
    assert_eq!(v.base_type(), "TAILQ_ENTRY");

    let v = var("WT_ITEM *item(WT_SESSION *s);").expect("variable");
    assert_eq!(summary(&v), ("WT_ITEM *".into(), "item".into(), ";".into()));
}

#[test]
fn enum_member() {
    let v = var("WT_A = 1 << 2,").expect("variable");
    assert_eq!(summary(&v), ("".into(), "WT_A".into(), ",".into()));
}

#[test]
fn comments() {
    let v = var("/* #private */ int x; // trailing\n").expect("variable");
    assert_eq!(v.pre_comment.map(|c| c.text), Some("/* #private */".into()));
    assert_eq!(v.post_comment.map(|c| c.text), Some("// trailing\n".into()));
}

#[test]
fn rejects_non_declarations() {
    assert!(var("void").is_none());
    assert!(var("x + y;").is_none());
    assert!(var("int *;").is_none());
    assert!(var("").is_none());
}

#[test]
fn carried_type() {
    let mut carry = TypeCarry::new();
    let vars: Vec<Variable> = statements("int *a, b, *c; long d;", 0)
        .filter_map(|s| carry.parse(&s.tokens))
        .collect();
    let got: Vec<(String, String)> = vars
        .iter()
        .map(|v| (v.typename.short_repr(), v.name.text.clone()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("int *".to_string(), "a".to_string()),
            ("int".to_string(), "b".to_string()),
            ("int *".to_string(), "c".to_string()),
            ("long".to_string(), "d".to_string()),
        ]
    );
}

#[test]
fn update_reports_type_mismatch() {
    let mut a = var("int x;").expect("variable");
    let b = var("long x; /* note */").expect("variable");
    let errors = a.update(&b);
    assert_eq!(errors, vec!["variable type mismatch for x: int != long".to_string()]);
    assert_eq!(a.post_comment.map(|c| c.text), Some("/* note */".into()));
}
