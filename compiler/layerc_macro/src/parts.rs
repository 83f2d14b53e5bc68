//! `#define` parsing.

use layerc_lexer::{blank_comments, is_well_formed, Cursor, Span, Token, TokenKind};
use layerc_parse::{pre_comment, Statement};

/// Parameter name standing for the variadic arguments.
pub const VA_ARGS: &str = "__VA_ARGS__";

/// One macro definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct MacroParts {
    pub name: Token,
    /// Parameters of a function-like macro; `None` for object-like macros.
    pub args: Option<Vec<Token>>,
    /// Body with continuations and comments blanked, trimmed. `None` when
    /// empty.
    pub body: Option<Token>,
    pub pre_comment: Option<Token>,
    /// The last parameter collects any extra arguments.
    pub is_va_args: bool,
    /// The body scans cleanly. Malformed bodies are substituted verbatim.
    pub is_well_formed: bool,
}

impl MacroParts {
    /// Parse a directive statement. Returns `None` unless it is a
    /// `#define`.
    pub fn from_statement(statement: &Statement) -> Option<MacroParts> {
        let (pre, start) = pre_comment(&statement.tokens);
        let directive = statement.tokens[start..]
            .iter()
            .find(|t| !t.kind.is_space())
            .filter(|t| t.kind == TokenKind::Directive)?;
        let mut parts = Self::from_directive(directive)?;
        parts.pre_comment = pre;
        Some(parts)
    }

    /// Parse `# define NAME[(params)] body` from a directive token.
    ///
    /// The macro is function-like only when `(` follows the name directly.
    pub fn from_directive(directive: &Token) -> Option<MacroParts> {
        let text = directive.text.as_str();
        let base = directive.span.start;
        let mut cursor = Cursor::new(text);
        if cursor.current() != b'#' {
            return None;
        }
        cursor.advance();
        cursor.eat_whitespace();
        if !cursor.starts_with("define") {
            return None;
        }
        cursor.advance_n("define".len());
        let before_name = cursor.pos();
        cursor.eat_whitespace();
        if cursor.pos() == before_name {
            return None;
        }

        let name_start = cursor.pos();
        cursor.eat_word();
        let name = &text[name_start..cursor.pos()];
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let name = Token::new(
            0,
            Span::new(base + name_start, base + cursor.pos()),
            TokenKind::Word,
            name,
        );

        let mut args = None;
        let mut is_va_args = false;
        if cursor.current() == b'(' {
            let close = cursor.rest().find(')')?;
            let inner_start = cursor.pos() + 1;
            let (params, va) = parse_params(&cursor.rest()[1..close], base + inner_start);
            args = Some(params);
            is_va_args = va;
            cursor.advance_n(close + 1);
        }

        let body = clean_body(cursor.rest(), base + cursor.pos());
        Some(Self::assemble(name, args, body, is_va_args))
    }

    /// A macro defined outside any source file. Spans are empty.
    pub fn new(name: &str, args: Option<&[&str]>, body: &str) -> MacroParts {
        let name = Token::new(0, Span::DUMMY, TokenKind::Word, name);
        let (args, is_va_args) = match args {
            Some(list) => {
                let (params, va) = parse_params(&list.join(","), 0);
                let params = params
                    .into_iter()
                    .map(|p| Token::new(p.index, Span::DUMMY, p.kind, p.text))
                    .collect();
                (Some(params), va)
            }
            None => (None, false),
        };
        let body = clean_body(body, 0).map(|b| Token::new(0, Span::DUMMY, b.kind, b.text));
        Self::assemble(name, args, body, is_va_args)
    }

    fn assemble(
        name: Token,
        args: Option<Vec<Token>>,
        body: Option<Token>,
        is_va_args: bool,
    ) -> MacroParts {
        let is_well_formed = body.as_ref().map_or(true, |b| is_well_formed(&b.text));
        MacroParts {
            name,
            args,
            body,
            pre_comment: None,
            is_va_args,
            is_well_formed,
        }
    }

    #[inline]
    pub fn is_function_like(&self) -> bool {
        self.args.is_some()
    }

    /// Merge a redefinition. The first definition is kept; differences are
    /// returned as messages.
    pub fn update(&mut self, other: &MacroParts) -> Vec<String> {
        let mut errors = Vec::new();
        if self.name != other.name {
            errors.push(format!(
                "macro name mismatch for {}: {} != {}",
                self.name, self.name, other.name
            ));
        }
        if self.args != other.args {
            errors.push(format!(
                "macro args mismatch for {}: {} != {}",
                self.name,
                format_params(self.args.as_deref()),
                format_params(other.args.as_deref())
            ));
        }
        if self.body != other.body {
            errors.push(format!("macro redefinition: {}", self.name));
        }
        if self.pre_comment.is_none() {
            self.pre_comment.clone_from(&other.pre_comment);
        }
        errors
    }
}

/// Split a parameter list. A trailing `...` becomes `__VA_ARGS__`; a
/// trailing `name...` keeps its name. Either makes the macro variadic.
fn parse_params(inner: &str, base: usize) -> (Vec<Token>, bool) {
    let mut params = Vec::new();
    let mut is_va_args = false;
    if inner.trim().is_empty() {
        return (params, is_va_args);
    }
    let mut offset = 0;
    for piece in inner.split(',') {
        let lead = piece.len() - piece.trim_start().len();
        let mut name = piece.trim();
        let start = base + offset + lead;
        offset += piece.len() + 1;
        if let Some(stripped) = name.strip_suffix("...") {
            is_va_args = true;
            name = stripped.trim_end();
            if name.is_empty() {
                params.push(Token::new(
                    params.len(),
                    Span::new(start, start + 3),
                    TokenKind::Word,
                    VA_ARGS,
                ));
                continue;
            }
        }
        params.push(Token::new(
            params.len(),
            Span::new(start, start + name.len()),
            TokenKind::Word,
            name,
        ));
    }
    (params, is_va_args)
}

/// Blank continuations and comments without changing the length, then trim
/// and shift the span to the trimmed text.
fn clean_body(raw: &str, base: usize) -> Option<Token> {
    let joined = raw.replace("\\\r\n", "   ").replace("\\\n", "  ");
    let cleaned = blank_comments(&joined);
    let lead = cleaned.len() - cleaned.trim_start().len();
    let body = cleaned.trim();
    if body.is_empty() {
        return None;
    }
    Some(Token::new(
        0,
        Span::new(base + lead, base + lead + body.len()),
        TokenKind::Directive,
        body,
    ))
}

fn format_params(args: Option<&[Token]>) -> String {
    match args {
        Some(args) => {
            let names: Vec<&str> = args.iter().map(|a| a.text.as_str()).collect();
            format!("({})", names.join(", "))
        }
        None => "<object-like>".to_owned(),
    }
}
