//! Statement segmentation.
//!
//! A [`Statements`] iterator pulls tokens and cuts them into statements:
//! - after a top-level `;` or `,`,
//! - after a `{...}` body that closes a function definition, a control
//!   statement, an `else` branch, a bare block or an `extern "C"` block,
//! - around each directive line, which is always a statement of its own,
//! - after a line holding nothing but a macro call such as `WT_THING(x)`
//!   when the next line starts a declaration.
//!
//! Horizontal whitespace and comments on the same line after a terminator
//! stay with the statement they follow.

use std::cell::OnceCell;
use std::collections::VecDeque;
use std::fmt;
use std::iter::Peekable;

use layerc_lexer::{tokenize_at, Delim, Span, Token, TokenKind, TokenList, TokenScanner};

use crate::keywords::{is_control_keyword, is_name, is_reserved, DEFAULT_IGNORED_ANNOTATIONS};
use crate::kind::{classify, record_body_index, strip_annotations, StatementKind};

/// Tokens of one statement and their cached classification.
#[derive(Clone, Debug)]
pub struct Statement {
    pub tokens: TokenList,
    kind: OnceCell<StatementKind>,
}

impl Statement {
    pub fn new(tokens: TokenList) -> Self {
        Statement {
            tokens,
            kind: OnceCell::new(),
        }
    }

    /// Classification, computed on first use.
    pub fn kind(&self) -> StatementKind {
        *self.kind.get_or_init(|| classify(&self.tokens))
    }

    #[inline]
    pub fn is(&self, kind: StatementKind) -> bool {
        self.kind().contains(kind)
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.tokens.span()
    }

    /// `","` or `";"` if the statement ends with one.
    pub fn terminator(&self) -> Option<&str> {
        let last = self.tokens.iter().rev().find(|t| !t.kind.is_trivia())?;
        (last.is_punct(",") || last.is_punct(";")).then_some(last.text.as_str())
    }

    /// Returns `true` if the statement has nothing but trivia.
    pub fn is_empty(&self) -> bool {
        self.tokens.iter().all(|t| t.kind.is_trivia())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.kind(), self.tokens)
    }
}

/// Lazy statement iterator over a token stream.
pub struct Statements<I: Iterator<Item = Token>> {
    tokens: Peekable<I>,
    /// Tokens already pulled from `tokens` by lookahead.
    pending: VecDeque<Token>,
}

impl<I: Iterator<Item = Token>> Statements<I> {
    pub fn new(tokens: I) -> Self {
        Statements {
            tokens: tokens.peekable(),
            pending: VecDeque::new(),
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        self.pending.pop_front().or_else(|| self.tokens.next())
    }

    fn peek_token(&mut self) -> Option<&Token> {
        if !self.pending.is_empty() {
            return self.pending.front();
        }
        self.tokens.peek()
    }

    /// The next `n` non-trivia tokens, stopping at a directive. Everything
    /// looked at stays buffered.
    fn lookahead(&mut self, n: usize) -> Vec<Token> {
        let mut found = Vec::new();
        let mut i = 0;
        while found.len() < n {
            if i == self.pending.len() {
                let Some(token) = self.tokens.next() else {
                    break;
                };
                self.pending.push_back(token);
            }
            let token = &self.pending[i];
            if token.kind == TokenKind::Directive {
                break;
            }
            if !token.kind.is_trivia() {
                found.push(token.clone());
            }
            i += 1;
        }
        found
    }

    /// Does the line after the current one start a declaration?
    fn declaration_follows(&mut self) -> bool {
        let ahead = self.lookahead(2);
        let Some(first) = ahead.first() else {
            return false;
        };
        if first.kind != TokenKind::Word {
            return false;
        }
        if is_reserved(&first.text) {
            return !is_control_keyword(&first.text);
        }
        ahead
            .get(1)
            .is_some_and(|next| next.kind == TokenKind::Word || next.is_punct("*"))
    }

    /// Move same-line whitespace and comments after a terminator into
    /// `current`.
    fn absorb_trailing(&mut self, current: &mut TokenList) {
        while let Some(next) = self.peek_token() {
            let kind = next.kind;
            if !matches!(
                kind,
                TokenKind::Whitespace | TokenKind::BlockComment | TokenKind::LineComment
            ) {
                break;
            }
            if let Some(token) = self.next_token() {
                current.push(token);
            }
            if kind == TokenKind::LineComment {
                break;
            }
        }
    }
}

impl<I: Iterator<Item = Token>> Iterator for Statements<I> {
    type Item = Statement;

    fn next(&mut self) -> Option<Statement> {
        let mut current = TokenList::new();
        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::Directive => {
                    if current.code().next().is_some() {
                        self.pending.push_front(token);
                    } else {
                        current.push(token);
                    }
                    return Some(Statement::new(current));
                }
                TokenKind::Punct if token.is_punct(";") || token.is_punct(",") => {
                    current.push(token);
                    self.absorb_trailing(&mut current);
                    return Some(Statement::new(current));
                }
                TokenKind::Group(Delim::Brace) => {
                    current.push(token);
                    if closes_statement(&current) {
                        self.absorb_trailing(&mut current);
                        return Some(Statement::new(current));
                    }
                }
                TokenKind::Newline => {
                    current.push(token);
                    if is_bare_call(&current) && self.declaration_follows() {
                        return Some(Statement::new(current));
                    }
                }
                _ => current.push(token),
            }
        }
        (!current.is_empty()).then(|| Statement::new(current))
    }
}

/// Segment C text whose first byte sits at offset `base` of its file.
pub fn statements(text: &str, base: usize) -> Statements<TokenScanner<'_>> {
    Statements::new(tokenize_at(text, base))
}

/// Segment the text of a token, such as a group interior, keeping file
/// offsets.
pub fn statements_of(token: &Token) -> Vec<Statement> {
    statements(&token.text, token.span.start).collect()
}

/// `NAME(...)` and nothing else: a macro invocation used as a statement.
fn is_bare_call(current: &TokenList) -> bool {
    let mut code = current.code();
    matches!(
        (code.next(), code.next(), code.next()),
        (Some(name), Some(args), None) if is_name(name) && args.is_group(Delim::Paren)
    )
}

/// Does the `{...}` that was just pushed end the statement?
fn closes_statement(current: &TokenList) -> bool {
    let all: Vec<&Token> = current.code().collect();
    let code = strip_annotations(&all, DEFAULT_IGNORED_ANNOTATIONS);
    let Some((_, head)) = code.split_last() else {
        return true;
    };
    let Some(first) = head.first() else {
        return true;
    };
    if first.is_word("extern") && head.get(1).is_some_and(|t| t.kind == TokenKind::Str) {
        return true;
    }
    if first.is_word("else") {
        return true;
    }
    if head.iter().any(|t| t.is_punct("=")) || record_body_index(&code).is_some() {
        return false;
    }
    head.iter().any(|t| t.is_group(Delim::Paren))
}

#[cfg(test)]
mod tests;
