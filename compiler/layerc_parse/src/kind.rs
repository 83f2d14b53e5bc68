//! Statement classification.
//!
//! Classification looks at the code tokens of a statement (trivia, `,` and
//! `;` removed, annotation macros stripped) and applies a fixed list of
//! token-pattern rules. The first rule that matches wins; anything no rule
//! recognizes is an expression.

use bitflags::bitflags;
use layerc_lexer::{Delim, Token, TokenKind, TokenList};

use crate::keywords::{
    is_control_keyword, is_name, is_record_keyword, is_type_keyword, DEFAULT_IGNORED_ANNOTATIONS,
};

bitflags! {
    /// Syntactic facets of a statement.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatementKind: u16 {
        /// A `#...` directive line.
        const PREPROC = 1 << 0;
        /// `extern "C" { ... }`.
        const EXTERN_C = 1 << 1;
        const TYPEDEF = 1 << 2;
        /// `struct`/`union`/`enum` with a body.
        const RECORD = 1 << 3;
        /// Function prototype or definition.
        const FUNCTION = 1 << 4;
        /// Function with a body.
        const FUNCTION_DEF = 1 << 5;
        /// Declares a name.
        const DECL = 1 << 6;
        /// Declaration with an initializer.
        const INITIALIZATION = 1 << 7;
        const EXPRESSION = 1 << 8;
        /// Control flow: `if`, `return`, `for`, ...
        const STATEMENT = 1 << 9;
    }
}

/// Classify a statement's tokens.
pub fn classify(tokens: &TokenList) -> StatementKind {
    if tokens
        .iter()
        .find(|t| !t.kind.is_trivia())
        .is_some_and(|t| t.kind == TokenKind::Directive)
    {
        return StatementKind::PREPROC;
    }

    let all: Vec<&Token> = tokens.code().collect();
    let code = strip_annotations(&all, DEFAULT_IGNORED_ANNOTATIONS);
    let Some(first) = code.first() else {
        return StatementKind::empty();
    };

    if first.is_word("extern")
        && code.get(1).is_some_and(|t| t.kind == TokenKind::Str)
        && code.iter().any(|t| t.is_group(Delim::Brace))
    {
        return StatementKind::EXTERN_C;
    }
    if first.kind == TokenKind::Word && is_control_keyword(&first.text) {
        return StatementKind::STATEMENT;
    }

    let mut kind = StatementKind::empty();
    if code.iter().any(|t| t.is_word("typedef")) {
        kind |= StatementKind::TYPEDEF;
    }
    if let Some(body) = record_body_index(&code) {
        kind |= StatementKind::RECORD;
        if !kind.contains(StatementKind::TYPEDEF) && code[body + 1..].iter().any(|t| is_name(t)) {
            kind |= StatementKind::DECL;
        }
        return kind;
    }
    if kind.contains(StatementKind::TYPEDEF) {
        return kind | StatementKind::DECL;
    }

    if let Some(eq) = code.iter().position(|t| t.is_punct("=")) {
        return if is_declarator_head(&code[..eq]) {
            StatementKind::DECL | StatementKind::INITIALIZATION
        } else {
            StatementKind::EXPRESSION
        };
    }

    if let Some(paren) = code.iter().position(|t| t.is_group(Delim::Paren)) {
        let head = &code[..paren];
        let has_body = code[paren + 1..].iter().any(|t| t.is_group(Delim::Brace));
        if has_body && is_type_head(head, 1) {
            return StatementKind::FUNCTION_DEF | StatementKind::FUNCTION;
        }
        if is_function_pointer(code[paren]) && is_declarator_head(&code) {
            return StatementKind::DECL;
        }
        if !has_body && is_type_head(head, 2) {
            return StatementKind::FUNCTION | StatementKind::DECL;
        }
        return StatementKind::EXPRESSION;
    }

    if is_declarator_head(&code) {
        StatementKind::DECL
    } else {
        StatementKind::EXPRESSION
    }
}

/// Drop annotation macros and the parenthesized group right after each.
pub(crate) fn strip_annotations<'t>(code: &[&'t Token], ignored: &[&str]) -> Vec<&'t Token> {
    let mut out = Vec::with_capacity(code.len());
    let mut i = 0;
    while i < code.len() {
        let token = code[i];
        if token.kind == TokenKind::Word && ignored.contains(&token.text.as_str()) {
            i += 1;
            if code.get(i).is_some_and(|t| t.is_group(Delim::Paren)) {
                i += 1;
            }
            continue;
        }
        out.push(token);
        i += 1;
    }
    out
}

/// Index of the record body in `[qualifiers] struct|union|enum [NAME] {...}`.
pub(crate) fn record_body_index(code: &[&Token]) -> Option<usize> {
    let mut i = code
        .iter()
        .position(|t| !(t.kind == TokenKind::Word && is_type_keyword(&t.text)))?;
    if !(code[i].kind == TokenKind::Word && is_record_keyword(&code[i].text)) {
        return None;
    }
    i += 1;
    if code.get(i).is_some_and(|t| t.is_ident()) {
        i += 1;
    }
    code.get(i)
        .is_some_and(|t| t.is_group(Delim::Brace))
        .then_some(i)
}

/// `(*name)` or `(* const name)`: a parenthesized pointer declarator.
pub(crate) fn is_function_pointer(token: &Token) -> bool {
    token.is_group(Delim::Paren) && token.text[1..].trim_start().starts_with('*')
}

/// Words and `*` only, ending in a declarable name, with at least
/// `min_words` words.
fn is_type_head(head: &[&Token], min_words: usize) -> bool {
    let mut words = 0;
    for t in head {
        if t.kind == TokenKind::Word {
            if !t.is_ident() {
                return false;
            }
            words += 1;
        } else if !t.is_punct("*") {
            return false;
        }
    }
    words >= min_words && head.last().is_some_and(|t| is_name(t))
}

/// Tokens that can precede `=` (or end) a variable declaration: words,
/// pointers, array bounds and function-pointer declarators.
fn is_declarator_head(head: &[&Token]) -> bool {
    let mut words = 0;
    let mut pointer_group = false;
    for t in head {
        match t.kind {
            TokenKind::Word if t.is_ident() => words += 1,
            TokenKind::Group(Delim::Bracket) => {}
            TokenKind::Group(Delim::Paren) if is_function_pointer(t) => pointer_group = true,
            TokenKind::Group(Delim::Paren) if pointer_group => {}
            TokenKind::Punct if t.is_punct("*") => {}
            _ => return false,
        }
    }
    words >= 2 || (words >= 1 && pointer_group)
}
