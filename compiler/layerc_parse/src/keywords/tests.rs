use super::*;
use layerc_lexer::tokenize;
use pretty_assertions::assert_eq;

fn list(source: &str) -> TokenList {
    tokenize(source).collect()
}

#[test]
fn base_type_of_record_pointer() {
    assert_eq!(get_base_type(&list("struct foo *")), "foo");
}

#[test]
fn base_type_skips_qualifiers() {
    assert_eq!(get_base_type(&list("const WT_ITEM")), "WT_ITEM");
    assert_eq!(get_base_type(&list("unsigned int")), "int");
}

#[test]
fn base_type_of_nothing() {
    assert_eq!(get_base_type(&list("struct")), "");
    assert_eq!(get_base_type(&TokenList::new()), "");
}

#[test]
fn reserved_words() {
    assert!(is_reserved("int"));
    assert!(is_reserved("struct"));
    assert!(is_reserved("return"));
    assert!(!is_reserved("WT_SESSION"));
}

#[test]
fn names_exclude_numbers_and_keywords() {
    let tokens = list("x 1 int");
    assert!(is_name(&tokens[0]));
    assert!(!is_name(&tokens[2]));
    assert!(!is_name(&tokens[4]));
}
