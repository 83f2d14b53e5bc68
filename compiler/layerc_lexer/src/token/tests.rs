use super::*;
use crate::tokenize;
use pretty_assertions::assert_eq;

fn list(source: &str) -> TokenList {
    tokenize(source).collect()
}

#[test]
fn equality_ignores_position() {
    let a = Token::new(0, Span::new(0, 3), TokenKind::Word, "foo");
    let b = Token::new(9, Span::new(40, 43), TokenKind::Word, "foo");
    assert_eq!(a, b);
}

#[test]
fn span_covers_first_to_last() {
    let tokens = list("  int x;");
    assert_eq!(tokens.span(), Span::new(0, 8));
    assert_eq!(TokenList::new().span(), Span::DUMMY);
}

#[test]
fn code_view_skips_trivia_and_separators() {
    let tokens = list("/* c */ int a, b; // x\n");
    let code: Vec<&str> = tokens.code().map(|t| t.text.as_str()).collect();
    assert_eq!(code, vec!["int", "a", "b"]);
    let code_rev: Vec<&str> = tokens.code_rev().map(|t| t.text.as_str()).collect();
    assert_eq!(code_rev, vec!["b", "a", "int"]);
}

#[test]
fn interior_strips_brackets_and_shifts_span() {
    let tokens = list("f(int x)");
    let group = &tokens[1];
    let inner = group.interior().expect("group has interior");
    assert_eq!(inner.text, "int x");
    assert_eq!(inner.span, Span::new(2, 7));
    assert!(tokens[0].interior().is_none());
}

#[test]
fn ident_excludes_numbers() {
    let tokens = list("x1 1x");
    assert!(tokens[0].is_ident());
    assert!(!tokens[2].is_ident());
}

#[test]
fn short_repr_and_text() {
    let tokens = list("a+b");
    assert_eq!(tokens.short_repr(), "a + b");
    assert_eq!(tokens.text(), "a+b");
}

#[test]
fn span_merge() {
    assert_eq!(Span::new(3, 5).merge(Span::new(1, 4)), Span::new(1, 5));
}
