//! Hand-written C token scanner.
//!
//! Token kinds are tried in a fixed order, longest match first: line
//! comment, block comment, string literal, character literal, balanced
//! group, newline, whitespace run, line continuation, directive line
//! (normal mode only), operator, word.
//!
//! # Balanced groups
//!
//! `(...)`, `[...]` and `{...}` are emitted as ONE token spanning the whole
//! group. Matching is an explicit depth-counting scan: every opener pushes
//! its closer on a stack, every closer must match the top of the stack.
//! Anything inside a group that does not scan as a token (or a mismatched
//! closer) makes the whole group fail; the opener is then emitted as an
//! [`TokenKind::Unknown`] token and scanning resumes right after it.
//!
//! # Coverage
//!
//! At top level every byte belongs to exactly one token: characters that
//! start no token become one-character `Unknown` tokens. Concatenating the
//! spans of all tokens reproduces the input exactly.

use crate::cursor::Cursor;
use crate::token::{Delim, Span, Token, TokenKind};

/// Which flavour of the grammar to scan.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ScanMode {
    /// Ordinary C text: `#` starts a directive line.
    #[default]
    Normal,
    /// Macro bodies: `#` and `##` are operators.
    Preproc,
}

/// Operators and punctuation, longest first within each leading byte.
const OPERATORS: &[&str] = &[
    "<<=", ">>=", "##", "++", "--", "->", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=",
    "-=", "*=", "/=", "%=", "&=", "^=", "|=", ",", ";", "?", ":", "!", "~", "#", ".", "+", "-",
    "*", "&", "/", "%", "<", ">", "^", "|", "=", "@",
];

/// Lazy scanner producing [`Token`]s.
///
/// Restartable: cloning a scanner snapshots its position.
#[derive(Clone, Debug)]
pub struct TokenScanner<'a> {
    cursor: Cursor<'a>,
    mode: ScanMode,
    base: usize,
    index: usize,
}

impl<'a> TokenScanner<'a> {
    /// Scan `text` whose first byte sits at offset `base` of the original
    /// source.
    pub fn new(text: &'a str, base: usize, mode: ScanMode) -> Self {
        Self {
            cursor: Cursor::new(text),
            mode,
            base,
            index: 0,
        }
    }

    /// Produce the next token, or `None` at EOF.
    pub fn next_token(&mut self) -> Option<Token> {
        if self.cursor.is_eof() {
            return None;
        }
        let start = self.cursor.pos();
        let kind = self.top_level();
        let text = self.cursor.slice_from(start);
        let token = Token::new(
            self.index,
            Span::new(self.base + start, self.base + self.cursor.pos()),
            kind,
            text,
        );
        self.index += 1;
        Some(token)
    }

    fn top_level(&mut self) -> TokenKind {
        let snapshot = self.cursor;
        if let Some(delim) = Delim::from_open(self.cursor.current()) {
            if self.group(delim) {
                return TokenKind::Group(delim);
            }
        } else if let Some(kind) = self.atom() {
            return kind;
        }
        self.cursor = snapshot;
        self.cursor.advance_char();
        TokenKind::Unknown
    }

    /// Scan a balanced group starting at the current opener.
    fn group(&mut self, delim: Delim) -> bool {
        let mut closers = vec![delim.close()];
        self.cursor.advance();
        while let Some(&close) = closers.last() {
            if self.cursor.is_eof() {
                return false;
            }
            let b = self.cursor.current();
            if let Some(inner) = Delim::from_open(b) {
                self.cursor.advance();
                closers.push(inner.close());
            } else if matches!(b, b')' | b']' | b'}') {
                if b != close {
                    return false;
                }
                self.cursor.advance();
                closers.pop();
            } else if self.atom().is_none() {
                return false;
            }
        }
        true
    }

    /// Scan one non-group token. Returns `None` without a guaranteed cursor
    /// position when nothing matches; callers restore their snapshot.
    fn atom(&mut self) -> Option<TokenKind> {
        match self.cursor.current() {
            b'/' if self.cursor.peek() == b'/' => {
                self.cursor.eat_line();
                Some(TokenKind::LineComment)
            }
            b'/' if self.cursor.peek() == b'*' => {
                let snapshot = self.cursor;
                self.cursor.advance_n(2);
                if self.cursor.eat_block_comment_body() {
                    Some(TokenKind::BlockComment)
                } else {
                    self.cursor = snapshot;
                    self.operator()
                }
            }
            b'"' => {
                self.cursor.advance();
                self.cursor.eat_quoted(b'"').then_some(TokenKind::Str)
            }
            b'\'' => {
                self.cursor.advance();
                self.cursor.eat_quoted(b'\'').then_some(TokenKind::Char)
            }
            b'\n' => {
                self.cursor.advance();
                Some(TokenKind::Newline)
            }
            b' ' | b'\t' | b'\r' | 0x0b | 0x0c => {
                self.cursor.eat_whitespace();
                Some(TokenKind::Whitespace)
            }
            b'\\' => {
                if self.cursor.rest().len() < 2 {
                    return None;
                }
                self.cursor.advance();
                self.cursor.advance_char();
                Some(TokenKind::LineContinuation)
            }
            b'#' if self.mode == ScanMode::Normal => {
                self.cursor.eat_line();
                Some(TokenKind::Directive)
            }
            _ => self.operator().or_else(|| self.word()),
        }
    }

    fn operator(&mut self) -> Option<TokenKind> {
        let op = OPERATORS.iter().find(|op| self.cursor.starts_with(op))?;
        self.cursor.advance_n(op.len());
        Some(TokenKind::Punct)
    }

    fn word(&mut self) -> Option<TokenKind> {
        let start = self.cursor.pos();
        self.cursor.eat_word();
        (self.cursor.pos() > start).then_some(TokenKind::Word)
    }
}

impl Iterator for TokenScanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Lazily tokenize C text starting at offset 0.
pub fn tokenize(text: &str) -> TokenScanner<'_> {
    TokenScanner::new(text, 0, ScanMode::Normal)
}

/// Lazily tokenize a fragment that starts at offset `base` of the original
/// source.
pub fn tokenize_at(text: &str, base: usize) -> TokenScanner<'_> {
    TokenScanner::new(text, base, ScanMode::Normal)
}

/// Lazily tokenize a macro body, where `#` and `##` are operators.
pub fn tokenize_preproc(text: &str, base: usize) -> TokenScanner<'_> {
    TokenScanner::new(text, base, ScanMode::Preproc)
}

/// Returns `true` if `text` is fully and contiguously covered by the
/// preprocessor-mode grammar, with no residue.
pub fn is_well_formed(text: &str) -> bool {
    tokenize_preproc(text, 0).all(|t| t.kind != TokenKind::Unknown)
}

/// Length of the balanced group starting at the beginning of `text`, if
/// `text` starts with an opener whose group scans cleanly.
pub fn group_len(text: &str, mode: ScanMode) -> Option<usize> {
    let delim = Delim::from_open(*text.as_bytes().first()?)?;
    let mut scanner = TokenScanner::new(text, 0, mode);
    scanner.group(delim).then(|| scanner.cursor.pos())
}
