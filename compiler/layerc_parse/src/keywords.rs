//! C keyword tables and type-name helpers.

use layerc_lexer::{Token, TokenKind, TokenList};

/// Qualifiers and storage classes that carry no type identity. They are
/// dropped from extracted type token lists.
pub const C_TYPE_KEYWORDS: &[&str] = &[
    "const",
    "static",
    "volatile",
    "extern",
    "register",
    "inline",
    "__inline",
    "__inline__",
    "restrict",
    "__restrict",
    "typedef",
    "auto",
    "_Noreturn",
    "_Thread_local",
];

/// Keywords that introduce a record definition.
pub const RECORD_KEYWORDS: &[&str] = &["struct", "union", "enum"];

/// Keywords that start a control-flow statement.
pub const CONTROL_KEYWORDS: &[&str] = &[
    "return", "if", "else", "for", "while", "do", "switch", "case", "default", "goto", "break",
    "continue",
];

/// Built-in type specifiers. Never a declared name.
pub const BUILTIN_TYPES: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "_Bool",
    "_Complex",
];

/// Annotation macros stripped before a function signature is parsed, along
/// with their parenthesized argument list.
pub const DEFAULT_IGNORED_ANNOTATIONS: &[&str] = &[
    "__attribute__",
    "WT_GCC_FUNC_ATTRIBUTE",
    "WT_GCC_FUNC_DECL_ATTRIBUTE",
    "WT_INLINE",
    "WT_ATTRIBUTE_LIBRARY_VISIBLE",
    "inline",
    "__inline",
];

#[inline]
pub fn is_type_keyword(word: &str) -> bool {
    C_TYPE_KEYWORDS.contains(&word)
}

#[inline]
pub fn is_record_keyword(word: &str) -> bool {
    RECORD_KEYWORDS.contains(&word)
}

#[inline]
pub fn is_control_keyword(word: &str) -> bool {
    CONTROL_KEYWORDS.contains(&word)
}

/// Returns `true` for any C keyword that cannot be a declared name.
pub fn is_reserved(word: &str) -> bool {
    is_type_keyword(word)
        || is_record_keyword(word)
        || is_control_keyword(word)
        || BUILTIN_TYPES.contains(&word)
        || word == "sizeof"
}

/// Returns `true` for an identifier that can name a declaration.
#[inline]
pub fn is_name(token: &Token) -> bool {
    token.is_ident() && !is_reserved(&token.text)
}

/// The identifying name of a type: its last identifier once pointers,
/// record keywords and qualifiers are dropped. Empty if there is none.
///
/// `struct foo *` -> `foo`, `const WT_ITEM` -> `WT_ITEM`,
/// `unsigned int` -> `int`.
pub fn get_base_type(typename: &TokenList) -> String {
    typename
        .code_rev()
        .find(|t| {
            t.kind == TokenKind::Word
                && t.is_ident()
                && !is_type_keyword(&t.text)
                && !is_record_keyword(&t.text)
        })
        .map(|t| t.text.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests;
