//! Variable declarations: fields, parameters, locals and globals.

use layerc_lexer::{tokenize_at, Delim, Token, TokenKind, TokenList};

use crate::comment::{post_comment, pre_comment};
use crate::keywords::{get_base_type, is_name, is_type_keyword};
use crate::kind::is_function_pointer;

/// One declarator with its type.
///
/// `struct foo *a[4] = {0},` gives typename `struct foo *`, name `a` and
/// end `,`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    /// Type tokens, qualifiers dropped. Empty when the type is carried over
    /// from a previous declarator and not yet filled in.
    pub typename: TokenList,
    pub name: Token,
    pub pre_comment: Option<Token>,
    pub post_comment: Option<Token>,
    /// The terminator of the declaration: `","`, `";"` or empty.
    pub end: String,
}

impl Variable {
    /// Parse one declarator. Returns `None` if the tokens do not end in a
    /// declarable name.
    pub fn from_var_def(tokens: &TokenList) -> Option<Variable> {
        let (pre, start) = pre_comment(tokens);
        let mut decl: Vec<&Token> = Vec::new();
        let mut pointer_name = None;
        let mut collecting = true;
        let mut end = String::new();

        for token in &tokens[start..] {
            if token.is_punct(",") || token.is_punct(";") {
                end.clone_from(&token.text);
                break;
            }
            if !collecting || token.kind.is_trivia() || token.kind == TokenKind::Directive {
                continue;
            }
            match token.kind {
                TokenKind::Group(Delim::Paren) => {
                    if pointer_name.is_some() {
                        collecting = false;
                    } else if is_function_pointer(token) {
                        pointer_name = Some(pointer_declarator_name(token)?);
                    } else if decl.last().is_some_and(|t| t.kind == TokenKind::Word) {
                        // `TAILQ_ENTRY(x) q`: a macro call in the type. A
                        // trailing call is a function declarator, dropped below.
                        decl.push(token);
                    } else {
                        collecting = false;
                    }
                }
                TokenKind::Group(Delim::Bracket) => {}
                TokenKind::Punct if token.is_punct("=") || token.is_punct(":") => {
                    collecting = false;
                }
                TokenKind::Word => decl.push(token),
                TokenKind::Punct if token.is_punct("*") => decl.push(token),
                _ => return None,
            }
        }

        let (name, type_tokens) = match pointer_name {
            Some(name) => (name, &decl[..]),
            None => {
                while decl.last().is_some_and(|t| t.is_group(Delim::Paren)) {
                    decl.pop();
                }
                let (last, rest) = decl.split_last()?;
                if !is_name(last) {
                    return None;
                }
                ((*last).clone(), rest)
            }
        };
        let typename = type_tokens
            .iter()
            .filter(|t| !is_type_keyword(&t.text))
            .map(|t| (*t).clone())
            .collect();

        Some(Variable {
            typename,
            name,
            pre_comment: pre,
            post_comment: post_comment(tokens, start),
            end,
        })
    }

    /// The identifying name of the type.
    pub fn base_type(&self) -> String {
        get_base_type(&self.typename)
    }

    /// Merge a second sighting. Returns conflict descriptions; comments
    /// missing here are taken from `other`.
    pub fn update(&mut self, other: &Variable) -> Vec<String> {
        let mut errors = Vec::new();
        if self.typename != other.typename {
            errors.push(format!(
                "variable type mismatch for {}: {} != {}",
                self.name,
                self.typename.short_repr(),
                other.typename.short_repr()
            ));
        }
        if self.name != other.name {
            errors.push(format!(
                "variable name mismatch: {} != {}",
                self.name, other.name
            ));
        }
        if self.pre_comment.is_none() {
            self.pre_comment.clone_from(&other.pre_comment);
        }
        if self.post_comment.is_none() {
            self.post_comment.clone_from(&other.post_comment);
        }
        errors
    }
}

/// Name inside `(*name)`, `(* const name)` or `(*name[4])`.
fn pointer_declarator_name(group: &Token) -> Option<Token> {
    let inner = group.interior()?;
    tokenize_at(&inner.text, inner.span.start)
        .filter(is_name)
        .last()
}

/// Parses the declarators of a statement list, carrying the type of a
/// `,`-terminated declarator over to the declarators that follow it.
#[derive(Clone, Debug, Default)]
pub struct TypeCarry {
    saved: Option<TokenList>,
}

impl TypeCarry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_carrying(&self) -> bool {
        self.saved.is_some()
    }

    /// Carry `typename` into the declarators that follow, as after the
    /// first declarator of `typedef struct s { ... } a, *b;`.
    pub fn carry(&mut self, typename: TokenList) {
        self.saved = Some(typename);
    }

    pub fn reset(&mut self) {
        self.saved = None;
    }

    /// Parse `tokens` as a declarator. A declarator without type words gets
    /// the carried type.
    pub fn parse(&mut self, tokens: &TokenList) -> Option<Variable> {
        let mut var = Variable::from_var_def(tokens)?;
        if !var.typename.iter().any(|t| t.kind == TokenKind::Word) {
            if let Some(saved) = &self.saved {
                var.typename = saved.iter().chain(var.typename.iter()).cloned().collect();
            }
        }
        // Pointer stars bind to the declarator, not to the shared type.
        self.saved = (var.end == ",").then(|| {
            var.typename
                .iter()
                .filter(|t| !t.is_punct("*"))
                .cloned()
                .collect()
        });
        Some(var)
    }
}

#[cfg(test)]
mod tests;
