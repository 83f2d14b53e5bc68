//! Text-level macro expansion.
//!
//! One pass over the input copies comments, string and character literals
//! and directive lines through untouched and replaces macro names as they
//! are found:
//!
//! 1. An object-like name becomes its body, itself expanded.
//! 2. A function-like name followed by a balanced `(...)` has its arguments
//!    split at top-level commas. Each argument is kept raw and also
//!    expanded on its own. The body is then rewritten once: `#param` gives
//!    the quoted raw argument, `a ## b` runs join raw texts, and a bare
//!    parameter gives the expanded argument. The result is expanded again.
//!
//! A name is left alone while its own expansion is in progress. The set of
//! names in progress belongs to a single [`Expander`], so independent
//! expansions never see each other's state.

use layerc_lexer::{blank_comments, group_len, tokenize, Cursor, ScanMode, Token};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::MacroParts;

/// Errors recorded while expanding. The offending text is kept as written.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExpansionError {
    #[error("macro {name}: got only {got} arguments, expected {expected}")]
    TooFewArguments {
        name: String,
        got: usize,
        expected: usize,
        /// Macros being expanded when the call was found, outermost first.
        stack: Vec<String>,
    },
}

/// Result of expanding a piece of text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MacroExpansion {
    pub text: String,
    pub errors: Vec<ExpansionError>,
}

/// Expansion state for one top-level `expand` call.
pub(crate) struct Expander<'m> {
    macros: &'m FxHashMap<String, MacroParts>,
    in_use: FxHashSet<&'m str>,
    stack: Vec<&'m str>,
    errors: Vec<ExpansionError>,
}

impl<'m> Expander<'m> {
    pub(crate) fn new(macros: &'m FxHashMap<String, MacroParts>) -> Self {
        Expander {
            macros,
            in_use: FxHashSet::default(),
            stack: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn finish(self, text: String) -> MacroExpansion {
        MacroExpansion {
            text,
            errors: self.errors,
        }
    }

    pub(crate) fn expand(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut cursor = Cursor::new(text);
        while !cursor.is_eof() {
            let start = cursor.pos();
            match cursor.current() {
                b'/' if cursor.peek() == b'/' => cursor.eat_line(),
                b'/' if cursor.peek() == b'*' => {
                    let snapshot = cursor;
                    cursor.advance_n(2);
                    if !cursor.eat_block_comment_body() {
                        cursor = snapshot;
                        cursor.advance();
                    }
                }
                quote @ (b'"' | b'\'') => {
                    cursor.advance();
                    cursor.eat_quoted(quote);
                }
                b'#' if cursor.rest().contains('\n') => {
                    cursor.eat_line();
                }
                b if is_word_start(b) => {
                    cursor.eat_word();
                    if cursor.pos() == start {
                        cursor.advance_char();
                    } else if let Some((replacement, end)) = self.expand_name(start, cursor) {
                        out.push_str(&replacement);
                        cursor = end;
                        continue;
                    }
                }
                _ => cursor.advance_char(),
            }
            out.push_str(cursor.slice_from(start));
        }
        out
    }

    /// Expand the name that spans `start..after.pos()`. Returns the
    /// replacement and the position to continue from, or `None` to copy the
    /// name as is.
    fn expand_name<'t>(
        &mut self,
        start: usize,
        after: Cursor<'t>,
    ) -> Option<(String, Cursor<'t>)> {
        let word = after.slice_from(start);
        if word.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let macros = self.macros;
        let (name, parts) = macros.get_key_value(word)?;
        if self.in_use.contains(word) {
            trace!(name = word, stack = ?self.stack, "recursive macro reference left as is");
            return None;
        }
        let Some(params) = &parts.args else {
            return Some((self.expand_object(name, parts), after));
        };

        let mut open = after;
        loop {
            open.eat_whitespace();
            if open.current() != b'\n' {
                break;
            }
            open.advance();
        }
        if open.current() != b'(' {
            return None;
        }
        let len = group_len(open.rest(), ScanMode::Normal)?;
        let args_text = &open.rest()[1..len - 1];
        let mut end = open;
        end.advance_n(len);

        let replacement = self
            .expand_function(name, parts, params, args_text)
            .unwrap_or_else(|| end.slice_from(start).to_owned());
        Some((replacement, end))
    }

    fn expand_object(&mut self, name: &'m str, parts: &'m MacroParts) -> String {
        let Some(body) = &parts.body else {
            return String::new();
        };
        if !parts.is_well_formed {
            return body.text.clone();
        }
        self.enter(name);
        let text = self.expand(&body.text);
        self.leave();
        text
    }

    /// `None` when the call has too few arguments.
    fn expand_function(
        &mut self,
        name: &'m str,
        parts: &'m MacroParts,
        params: &'m [Token],
        args_text: &str,
    ) -> Option<String> {
        let Some(body) = &parts.body else {
            return Some(String::new());
        };

        let mut args = vec![String::new()];
        for token in tokenize(args_text) {
            if token.is_punct(",") {
                if args.len() < params.len() {
                    args.push(String::new());
                    continue;
                }
                if !parts.is_va_args {
                    break;
                }
            }
            if let Some(last) = args.last_mut() {
                last.push_str(&token.text);
            }
        }
        if parts.is_va_args && args.len() + 1 == params.len() {
            args.push(String::new());
        }
        if args.len() < params.len() {
            let error = ExpansionError::TooFewArguments {
                name: name.to_owned(),
                got: args.len(),
                expected: params.len(),
                stack: self.stack.iter().map(|s| (*s).to_owned()).collect(),
            };
            debug!("{error}");
            self.errors.push(error);
            return None;
        }
        if !parts.is_well_formed {
            return Some(body.text.clone());
        }

        let substituted = if params.is_empty() {
            body.text.clone()
        } else {
            // A trailing `//` comment would swallow the rest of the body.
            let raw: Vec<String> = args
                .iter()
                .map(|a| blank_comments(a).trim().to_owned())
                .collect();
            let expanded: Vec<String> = raw.iter().map(|a| self.expand(a)).collect();
            substitute(&body.text, params, &raw, &expanded)
        };

        self.enter(name);
        let text = self.expand(&substituted);
        self.leave();
        Some(text)
    }

    fn enter(&mut self, name: &'m str) {
        self.in_use.insert(name);
        self.stack.push(name);
    }

    fn leave(&mut self) {
        if let Some(name) = self.stack.pop() {
            self.in_use.remove(name);
        }
    }
}

/// Rewrite a macro body: `#param`, `a ## b` runs and bare parameters.
/// String and character literals are copied unchanged.
fn substitute(body: &str, params: &[Token], raw: &[String], expanded: &[String]) -> String {
    let index_of = |word: &str| params.iter().position(|p| p.text == word);
    let mut out = String::with_capacity(body.len());
    let mut cursor = Cursor::new(body);
    while !cursor.is_eof() {
        let start = cursor.pos();
        match cursor.current() {
            quote @ (b'"' | b'\'') => {
                cursor.advance();
                cursor.eat_quoted(quote);
            }
            b'#' if cursor.peek() == b'#' => cursor.advance_n(2),
            b'#' => {
                let mut operand = cursor;
                operand.advance();
                operand.eat_whitespace();
                let word_start = operand.pos();
                operand.eat_word();
                if operand.pos() > word_start {
                    let word = operand.slice_from(word_start);
                    out.push('"');
                    if let Some(i) = index_of(word) {
                        out.push_str(&c_string_escape(&raw[i]));
                    }
                    out.push('"');
                    cursor = operand;
                    continue;
                }
                cursor.advance();
            }
            b if is_word_start(b) => {
                cursor.eat_word();
                if cursor.pos() == start {
                    cursor.advance_char();
                } else {
                    let mut operands = vec![cursor.slice_from(start)];
                    loop {
                        let mut next = cursor;
                        next.eat_whitespace();
                        if !next.starts_with("##") {
                            break;
                        }
                        next.advance_n(2);
                        next.eat_whitespace();
                        let word_start = next.pos();
                        next.eat_word();
                        if next.pos() == word_start {
                            break;
                        }
                        operands.push(next.slice_from(word_start));
                        cursor = next;
                    }
                    if operands.len() > 1 {
                        for word in operands {
                            out.push_str(index_of(word).map_or(word, |i| raw[i].as_str()));
                        }
                    } else if let Some(i) = index_of(operands[0]) {
                        out.push_str(&expanded[i]);
                    } else {
                        out.push_str(operands[0]);
                    }
                    continue;
                }
            }
            _ => cursor.advance_char(),
        }
        out.push_str(cursor.slice_from(start));
    }
    out
}

#[inline]
fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Escape text for use inside a C string literal.
pub fn c_string_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}
