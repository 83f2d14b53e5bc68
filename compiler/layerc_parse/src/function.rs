//! Function prototypes and definitions.

use layerc_lexer::{Delim, Token, TokenKind, TokenList};

use crate::comment::{post_comment, pre_comment};
use crate::keywords::{is_name, is_type_keyword, DEFAULT_IGNORED_ANNOTATIONS};
use crate::kind::StatementKind;
use crate::statement::{statements_of, Statement};
use crate::variable::{TypeCarry, Variable};

/// The parts of a function prototype or definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionParts {
    /// Return type tokens, qualifiers dropped.
    pub typename: TokenList,
    pub name: Token,
    /// Interior of the parameter list.
    pub args: Token,
    /// Interior of the body, if this is a definition.
    pub body: Option<Token>,
    pub pre_comment: Option<Token>,
    pub post_comment: Option<Token>,
}

impl FunctionParts {
    /// Parse with the default set of ignorable annotation macros.
    pub fn from_statement(statement: &Statement) -> Option<FunctionParts> {
        Self::from_tokens(&statement.tokens, DEFAULT_IGNORED_ANNOTATIONS)
    }

    /// Parse function tokens, dropping each `ignored` annotation macro and
    /// its parenthesized arguments first.
    pub fn from_tokens(tokens: &TokenList, ignored: &[&str]) -> Option<FunctionParts> {
        let tokens = strip_ignored(tokens, ignored);
        let (pre, start) = pre_comment(&tokens);

        let mut head: Vec<&Token> = Vec::new();
        let mut rest = tokens[start..].iter();
        let args = loop {
            let token = rest.next()?;
            if token.is_group(Delim::Paren) {
                break token.interior()?;
            }
            if token.is_code() {
                head.push(token);
            }
        };
        let name = head.pop().filter(|t| is_name(t))?.clone();
        let body = rest
            .find(|t| t.is_group(Delim::Brace))
            .and_then(Token::interior);
        let typename = head
            .into_iter()
            .filter(|t| !is_type_keyword(&t.text))
            .cloned()
            .collect();

        Some(FunctionParts {
            typename,
            name,
            args,
            body,
            pre_comment: pre,
            post_comment: post_comment(&tokens, start),
        })
    }

    #[inline]
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Declared parameters. `(void)` and `()` give none.
    pub fn get_args(&self) -> Vec<Variable> {
        let mut carry = TypeCarry::new();
        statements_of(&self.args)
            .iter()
            .filter_map(|s| carry.parse(&s.tokens))
            .collect()
    }

    /// Local variables declared at the top of the body, up to the first
    /// statement or expression.
    pub fn get_local_vars(&self) -> Vec<Variable> {
        let Some(body) = &self.body else {
            return Vec::new();
        };
        let mut vars = Vec::new();
        let mut carry = TypeCarry::new();
        for statement in statements_of(body) {
            let kind = statement.kind();
            if !carry.is_carrying()
                && (kind.contains(StatementKind::STATEMENT)
                    || (kind.contains(StatementKind::EXPRESSION)
                        && !kind.contains(StatementKind::INITIALIZATION)))
            {
                break;
            }
            let is_var_decl = kind.contains(StatementKind::DECL)
                && !kind.intersects(StatementKind::FUNCTION | StatementKind::RECORD);
            if carry.is_carrying() || is_var_decl {
                if let Some(var) = carry.parse(&statement.tokens) {
                    vars.push(var);
                }
            } else {
                carry.reset();
            }
        }
        vars
    }

    /// Parameter types with the parameter names removed, for comparing a
    /// prototype with a definition.
    pub fn signature(&self) -> Vec<String> {
        let params: Vec<String> = statements_of(&self.args)
            .iter()
            .map(param_type)
            .filter(|p| !p.is_empty())
            .collect();
        if params.len() == 1 && params[0] == "void" {
            return Vec::new();
        }
        params
    }

    /// Merge a second sighting. Returns conflict descriptions; comments
    /// missing here are taken from `other`.
    pub fn update(&mut self, other: &FunctionParts) -> Vec<String> {
        let mut errors = Vec::new();
        if self.typename != other.typename {
            errors.push(format!(
                "function return type mismatch for {}: {} != {}",
                self.name,
                self.typename.short_repr(),
                other.typename.short_repr()
            ));
        }
        if self.name != other.name {
            errors.push(format!(
                "function name mismatch: {} != {}",
                self.name, other.name
            ));
        }
        let (mine, theirs) = (self.signature(), other.signature());
        if mine != theirs {
            errors.push(format!(
                "function args mismatch for {}: ({}) != ({})",
                self.name,
                mine.join(", "),
                theirs.join(", ")
            ));
        }
        if let (Some(a), Some(b)) = (&self.body, &other.body) {
            if a != b {
                errors.push(format!("function redefinition: {}", self.name));
            }
        }
        if self.body.is_none() {
            self.body.clone_from(&other.body);
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

/// The type of one parameter: code tokens before any `=`, with a trailing
/// parameter name dropped when the type has at least one other word.
fn param_type(statement: &Statement) -> String {
    let mut code: Vec<&Token> = statement
        .tokens
        .code()
        .filter(|t| !is_type_keyword(&t.text))
        .collect();
    let words = code.iter().filter(|t| t.kind == TokenKind::Word).count();
    if words >= 2 && code.last().is_some_and(|t| is_name(t)) {
        code.pop();
    }
    code.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" ")
}

/// Remove annotation macros and the group that follows each.
fn strip_ignored(tokens: &TokenList, ignored: &[&str]) -> TokenList {
    let mut out = TokenList::new();
    let mut skip_group = false;
    for token in tokens {
        if skip_group {
            if token.kind.is_space() {
                continue;
            }
            skip_group = false;
            if token.is_group(Delim::Paren) {
                continue;
            }
        }
        if token.kind == TokenKind::Word && ignored.contains(&token.text.as_str()) {
            skip_group = true;
            continue;
        }
        out.push(token.clone());
    }
    out
}
