//! Leading and trailing comments of a statement.
//!
//! Visibility annotations (`#public`, `#private(MODULE)`) live in the comment
//! right before a declaration or on the same line after it.

use layerc_lexer::{Token, TokenList};

/// The first non-space token, if it is a comment, and the index of the
/// first token after it (or of the first non-space token when there is no
/// comment).
pub fn pre_comment(tokens: &TokenList) -> (Option<Token>, usize) {
    match tokens.iter().position(|t| !t.kind.is_space()) {
        Some(i) if tokens[i].kind.is_comment() => (Some(tokens[i].clone()), i + 1),
        Some(i) => (None, i),
        None => (None, tokens.len()),
    }
}

/// The last non-space token, if it is a comment that comes after `from`.
pub fn post_comment(tokens: &TokenList, from: usize) -> Option<Token> {
    let i = tokens.iter().rposition(|t| !t.kind.is_space())?;
    (i >= from && tokens[i].kind.is_comment()).then(|| tokens[i].clone())
}
