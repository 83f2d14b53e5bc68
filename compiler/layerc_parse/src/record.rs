//! Struct, union and enum definitions.

use layerc_lexer::{Delim, Token, TokenKind, TokenList};

use crate::comment::{post_comment, pre_comment};
use crate::keywords::{is_name, is_record_keyword, is_type_keyword, DEFAULT_IGNORED_ANNOTATIONS};
use crate::kind::StatementKind;
use crate::statement::{statements_of, Statement};
use crate::variable::{TypeCarry, Variable};

/// The parts of `[typedef] struct|union|enum [NAME] { ... } [declarators]`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordParts {
    /// `struct`, `union` or `enum`.
    pub kind: Token,
    /// The tag, or the first typedef name of an anonymous record.
    pub name: Option<Token>,
    /// Interior of the body.
    pub body: Token,
    /// Fields, or enumerators of an enum.
    pub members: Vec<Variable>,
    /// Names bound by `typedef`.
    pub typedefs: Vec<Variable>,
    /// Variables declared right after the body.
    pub vardefs: Vec<Variable>,
    /// Named records defined inside the body, at any depth.
    pub nested: Vec<RecordParts>,
    /// Name of the enclosing record, if nested.
    pub parent: Option<String>,
    pub pre_comment: Option<Token>,
    pub post_comment: Option<Token>,
}

impl RecordParts {
    pub fn from_statement(statement: &Statement) -> Option<RecordParts> {
        Self::from_tokens(&statement.tokens, None)
    }

    /// Parse record tokens. `parent` names the enclosing record.
    pub fn from_tokens(tokens: &TokenList, parent: Option<&str>) -> Option<RecordParts> {
        let (pre, start) = pre_comment(tokens);
        let post = post_comment(tokens, start);
        let mut code = tokens[start..].iter().filter(|t| t.is_code());

        let mut is_typedef = false;
        let kind = loop {
            let token = code.next()?;
            if token.is_word("typedef") {
                is_typedef = true;
            } else if token.kind == TokenKind::Word && is_record_keyword(&token.text) {
                break token.clone();
            } else if !is_skippable(token) {
                return None;
            }
        };

        let mut name = None;
        let body = loop {
            let token = code.next()?;
            if token.is_group(Delim::Brace) {
                break token.interior()?;
            }
            if is_skippable(token) {
                continue;
            }
            if name.is_some() || !is_name(token) {
                return None;
            }
            name = Some(token.clone());
        };

        let end = tokens
            .iter()
            .rev()
            .find(|t| t.is_punct(",") || t.is_punct(";"))
            .map(|t| t.text.clone())
            .unwrap_or_default();
        let mut record_type = TokenList::new();
        record_type.push(kind.clone());
        if let Some(name) = &name {
            record_type.push(name.clone());
        }
        let declared: Vec<Variable> = code
            .filter(|t| is_name(t) && !is_skippable(t))
            .map(|t| Variable {
                typename: record_type.clone(),
                name: t.clone(),
                pre_comment: pre.clone(),
                post_comment: post.clone(),
                end: end.clone(),
            })
            .collect();
        let (typedefs, vardefs) = if is_typedef {
            (declared, Vec::new())
        } else {
            (Vec::new(), declared)
        };
        if name.is_none() {
            name = typedefs.first().map(|v| v.name.clone());
        }

        let mut record = RecordParts {
            kind,
            name,
            body,
            members: Vec::new(),
            typedefs,
            vardefs,
            nested: Vec::new(),
            parent: parent.map(str::to_owned),
            pre_comment: pre,
            post_comment: post,
        };
        record.parse_members();
        Some(record)
    }

    #[inline]
    pub fn name_str(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.text.as_str())
    }

    #[inline]
    pub fn is_nested(&self) -> bool {
        self.parent.is_some()
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        self.kind.is_word("enum")
    }

    fn parse_members(&mut self) {
        let parent = self.name_str().unwrap_or_default().to_owned();
        let mut carry = TypeCarry::new();
        for statement in statements_of(&self.body) {
            if !statement.is(StatementKind::RECORD) {
                if let Some(var) = carry.parse(&statement.tokens) {
                    self.members.push(var);
                }
                continue;
            }
            carry.reset();
            let Some(mut inner) = RecordParts::from_tokens(&statement.tokens, Some(&parent)) else {
                continue;
            };
            if inner.name.is_none() && inner.vardefs.is_empty() {
                // Anonymous member record: its fields belong to this record.
                self.members.append(&mut inner.members);
            } else {
                self.members.extend(inner.vardefs.iter().cloned());
            }
            let deeper = std::mem::take(&mut inner.nested);
            if inner.name.is_some() {
                self.nested.push(inner);
            }
            self.nested.extend(deeper);
        }
    }

    /// Merge a second sighting. Returns conflict descriptions; comments
    /// missing here are taken from `other`.
    pub fn update(&mut self, other: &RecordParts) -> Vec<String> {
        let mut errors = Vec::new();
        let name = self.name_str().unwrap_or("<anonymous>").to_owned();
        if self.kind != other.kind {
            errors.push(format!(
                "record kind mismatch for {name}: {} != {}",
                self.kind, other.kind
            ));
        }
        if self.name != other.name {
            errors.push(format!(
                "record name mismatch: {name} != {}",
                other.name_str().unwrap_or("<anonymous>")
            ));
        }
        if self.body != other.body {
            errors.push(format!("record redefinition: {name}"));
        }
        for typedef in &other.typedefs {
            if !self.typedefs.iter().any(|t| t.name == typedef.name) {
                self.typedefs.push(typedef.clone());
            }
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

/// Qualifiers, annotation macros and their argument groups.
fn is_skippable(token: &Token) -> bool {
    token.is_group(Delim::Paren)
        || (token.kind == TokenKind::Word
            && (is_type_keyword(&token.text)
                || DEFAULT_IGNORED_ANNOTATIONS.contains(&token.text.as_str())))
}
