//! Byte cursor over C source text.
//!
//! The cursor advances through the text byte-by-byte and reports `0x00`
//! past the end, so scanning loops terminate on the same byte whether they
//! hit EOF or an interior null. Use [`Cursor::is_eof`] to tell them apart.
//!
//! Bulk skips (comment bodies, directive lines, quoted literals) use
//! `memchr` to jump between the few bytes that matter.

/// Cursor over a source fragment.
///
/// The cursor is [`Copy`], so callers take cheap snapshots before a
/// speculative scan (balanced groups, block comments, quoted literals) and
/// restore them when the scan fails.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at position 0.
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Returns the byte at the current position, or `0x00` at EOF.
    #[inline]
    pub fn current(&self) -> u8 {
        self.byte_at(self.pos)
    }

    /// Returns the byte one position ahead of current.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.byte_at(self.pos + 1)
    }

    /// Returns the byte two positions ahead of current.
    #[inline]
    pub fn peek2(&self) -> u8 {
        self.byte_at(self.pos + 2)
    }

    #[inline]
    fn byte_at(&self, pos: usize) -> u8 {
        self.text.as_bytes().get(pos).copied().unwrap_or(0)
    }

    /// Returns the full character at the current position.
    #[inline]
    pub fn current_char(&self) -> Option<char> {
        self.text.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    /// Advance the cursor by one byte.
    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    /// Advance the cursor by `n` bytes.
    #[inline]
    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    /// Advance the cursor past one full UTF-8 character.
    #[inline]
    pub fn advance_char(&mut self) {
        self.pos += self.current_char().map_or(1, char::len_utf8);
    }

    /// Returns `true` once every byte of the text has been consumed.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Current byte offset in the text.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns `true` if the remaining text starts with `prefix`.
    #[inline]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    /// The unconsumed remainder of the text.
    #[inline]
    pub fn rest(&self) -> &'a str {
        self.text.get(self.pos..).unwrap_or("")
    }

    /// Extract the text from `start` to the current position.
    pub fn slice_from(&self, start: usize) -> &'a str {
        self.text.get(start..self.pos).unwrap_or("")
    }

    /// Advance while `pred` returns `true` for the current byte. Stops at EOF.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Advance over horizontal whitespace (space, tab, `\r`, vertical tab,
    /// form feed).
    #[inline]
    pub fn eat_whitespace(&mut self) {
        self.eat_while(|b| matches!(b, b' ' | b'\t' | b'\r' | 0x0b | 0x0c));
    }

    /// Advance over a run of word characters: ASCII alphanumerics, `_`, and
    /// any non-ASCII alphanumeric character.
    pub fn eat_word(&mut self) {
        while let Some(c) = self.current_char() {
            if c == '_' || c.is_alphanumeric() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    /// Advance to just past the next unescaped `\n`, or to EOF.
    ///
    /// A backslash escapes the following byte, so `\`-newline continuations
    /// keep the line going. Used for line comments and directive lines.
    pub fn eat_line(&mut self) {
        loop {
            let rest = &self.text.as_bytes()[self.pos.min(self.text.len())..];
            match memchr::memchr2(b'\n', b'\\', rest) {
                Some(offset) if rest[offset] == b'\n' => {
                    self.pos += offset + 1;
                    return;
                }
                Some(offset) => {
                    // Skip the backslash and whatever byte it escapes.
                    self.pos = (self.pos + offset + 2).min(self.text.len());
                }
                None => {
                    self.pos = self.text.len();
                    return;
                }
            }
        }
    }

    /// Advance past the `*/` that closes a block comment whose `/*` has
    /// already been consumed.
    ///
    /// Returns `false` and leaves the cursor untouched if the comment is
    /// never closed.
    pub fn eat_block_comment_body(&mut self) -> bool {
        match memchr::memmem::find(self.rest().as_bytes(), b"*/") {
            Some(offset) => {
                self.pos += offset + 2;
                true
            }
            None => false,
        }
    }

    /// Advance past the closing `quote` of a string or character literal
    /// whose opening quote has already been consumed.
    ///
    /// Backslash escapes any byte (including newlines). Returns `false` and
    /// leaves the cursor untouched if the literal is never closed.
    pub fn eat_quoted(&mut self, quote: u8) -> bool {
        let bytes = self.text.as_bytes();
        let mut pos = self.pos;
        loop {
            let rest = &bytes[pos.min(bytes.len())..];
            match memchr::memchr2(quote, b'\\', rest) {
                Some(offset) if rest[offset] == quote => {
                    self.pos = pos + offset + 1;
                    return true;
                }
                Some(offset) => {
                    if pos + offset + 1 >= bytes.len() {
                        return false;
                    }
                    pos += offset + 2;
                }
                None => return false,
            }
        }
    }
}
