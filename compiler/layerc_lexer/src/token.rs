//! Token model: spans, kinds, tokens and token lists.
//!
//! Every token remembers the byte range it occupies in the *original*
//! source file. Fragments that are re-tokenized later (group interiors,
//! macro bodies) are scanned with a base offset, so spans stay valid all the
//! way down to definition locations.

use std::fmt;
use std::ops::Deref;

/// Byte range in the original source text, end exclusive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Empty span at offset 0.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Bracket pair of a balanced group token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Delim {
    /// `( ... )`
    Paren,
    /// `[ ... ]`
    Bracket,
    /// `{ ... }`
    Brace,
}

impl Delim {
    /// The delimiter opened by `byte`, if any.
    #[inline]
    pub fn from_open(byte: u8) -> Option<Delim> {
        match byte {
            b'(' => Some(Delim::Paren),
            b'[' => Some(Delim::Bracket),
            b'{' => Some(Delim::Brace),
            _ => None,
        }
    }

    /// Closing byte for this delimiter.
    #[inline]
    pub fn close(self) -> u8 {
        match self {
            Delim::Paren => b')',
            Delim::Bracket => b']',
            Delim::Brace => b'}',
        }
    }
}

/// Lexical category of a token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// `// ...` up to and including the newline.
    LineComment,
    /// `/* ... */`
    BlockComment,
    /// `"..."`
    Str,
    /// `'...'`
    Char,
    /// A balanced bracket group, emitted whole.
    Group(Delim),
    /// A single `\n`.
    Newline,
    /// A run of horizontal whitespace.
    Whitespace,
    /// A backslash and the byte it escapes, usually a newline.
    LineContinuation,
    /// A preprocessor directive line (`#...` to end of line, continuations
    /// included). Only produced outside preprocessor mode.
    Directive,
    /// Operator or punctuation.
    Punct,
    /// Identifier, keyword or number.
    Word,
    /// A character that starts no valid token.
    Unknown,
}

impl TokenKind {
    /// Whitespace, newlines and line continuations.
    #[inline]
    pub fn is_space(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Newline | TokenKind::LineContinuation
        )
    }

    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Spaces and comments.
    #[inline]
    pub fn is_trivia(self) -> bool {
        self.is_space() || self.is_comment()
    }
}

/// One token of source text.
///
/// Equality compares text only: two sightings of the same declaration in
/// different files compare equal even though their positions differ.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// Position in the token stream this token came from.
    pub index: usize,
    /// Byte range in the original source text.
    pub span: Span,
    pub kind: TokenKind,
    pub text: String,
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Token {}

impl Token {
    pub fn new(index: usize, span: Span, kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            index,
            span,
            kind,
            text: text.into(),
        }
    }

    /// Returns `true` if this token is the punctuation `p`.
    #[inline]
    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == p
    }

    /// Returns `true` if this token is the word `w`.
    #[inline]
    pub fn is_word(&self, w: &str) -> bool {
        self.kind == TokenKind::Word && self.text == w
    }

    /// Returns `true` for a word that can be an identifier (does not start
    /// with a digit).
    #[inline]
    pub fn is_ident(&self) -> bool {
        self.kind == TokenKind::Word && !self.text.starts_with(|c: char| c.is_ascii_digit())
    }

    #[inline]
    pub fn is_group(&self, delim: Delim) -> bool {
        self.kind == TokenKind::Group(delim)
    }

    /// Code tokens carry syntax: everything except trivia, directives and
    /// the `,`/`;` separators.
    #[inline]
    pub fn is_code(&self) -> bool {
        !(self.kind.is_trivia()
            || self.kind == TokenKind::Directive
            || self.is_punct(",")
            || self.is_punct(";"))
    }

    /// The inside of a group token, brackets removed, with its span shrunk
    /// to match. Returns `None` for non-group tokens.
    pub fn interior(&self) -> Option<Token> {
        if !matches!(self.kind, TokenKind::Group(_)) || self.text.len() < 2 {
            return None;
        }
        let inner = &self.text[1..self.text.len() - 1];
        Some(Token::new(
            self.index,
            Span::new(self.span.start + 1, self.span.end - 1),
            TokenKind::Group(self.delim()?),
            inner,
        ))
    }

    fn delim(&self) -> Option<Delim> {
        match self.kind {
            TokenKind::Group(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Ordered list of tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    #[inline]
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn from_vec(tokens: Vec<Token>) -> Self {
        TokenList { tokens }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Token> {
        self.tokens.pop()
    }

    #[inline]
    pub fn remove(&mut self, index: usize) -> Token {
        self.tokens.remove(index)
    }

    #[inline]
    pub fn retain(&mut self, f: impl FnMut(&Token) -> bool) {
        self.tokens.retain(f);
    }

    #[inline]
    pub fn into_vec(self) -> Vec<Token> {
        self.tokens
    }

    /// Range covering the first through last token, `0..0` when empty.
    pub fn span(&self) -> Span {
        match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => Span::new(first.span.start, last.span.end),
            _ => Span::DUMMY,
        }
    }

    /// Code tokens from the front.
    pub fn code(&self) -> impl DoubleEndedIterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.is_code())
    }

    /// Code tokens from the back.
    pub fn code_rev(&self) -> impl Iterator<Item = &Token> {
        self.code().rev()
    }

    /// Token texts joined with single spaces, for messages.
    pub fn short_repr(&self) -> String {
        let mut out = String::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&token.text);
        }
        out
    }

    /// Token texts concatenated without separators.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

impl Deref for TokenList {
    type Target = [Token];

    fn deref(&self) -> &[Token] {
        &self.tokens
    }
}

impl FromIterator<Token> for TokenList {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        TokenList {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TokenList {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl fmt::Display for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.span())?;
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str("\u{2307}")?;
            }
            f.write_str(&token.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
