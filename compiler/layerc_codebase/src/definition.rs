//! Symbol-table entries and the rules for merging repeated sightings.

use std::fmt;

use layerc_diagnostic::{DiagnosticSink, WarningKind};
use layerc_lexer::Token;
use layerc_parse::{FunctionParts, RecordParts, Variable};

use crate::{Scope, Visibility};

/// What a definition names.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum DefinitionKind {
    Function,
    Record,
    Field,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DefinitionKind::Function => "function",
            DefinitionKind::Record => "record",
            DefinitionKind::Field => "field",
        })
    }
}

/// The parsed declaration behind a definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Details {
    Function(FunctionParts),
    Record(RecordParts),
    Field(Variable),
}

impl Details {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Details::Function(_) => DefinitionKind::Function,
            Details::Record(_) => DefinitionKind::Record,
            Details::Field(_) => DefinitionKind::Field,
        }
    }

    /// Records always have a body; fields never do.
    pub fn has_body(&self) -> bool {
        match self {
            Details::Function(func) => func.has_body(),
            Details::Record(_) => true,
            Details::Field(_) => false,
        }
    }

    pub fn pre_comment(&self) -> Option<&Token> {
        match self {
            Details::Function(func) => func.pre_comment.as_ref(),
            Details::Record(record) => record.pre_comment.as_ref(),
            Details::Field(var) => var.pre_comment.as_ref(),
        }
    }

    pub fn post_comment(&self) -> Option<&Token> {
        match self {
            Details::Function(func) => func.post_comment.as_ref(),
            Details::Record(record) => record.post_comment.as_ref(),
            Details::Field(var) => var.post_comment.as_ref(),
        }
    }

    pub fn short_repr(&self) -> String {
        match self {
            Details::Function(func) => format!(
                "{} {}({}){}",
                func.typename.short_repr(),
                func.name,
                func.signature().join(", "),
                if func.has_body() { " {...}" } else { ";" }
            ),
            Details::Record(record) => format!(
                "{} {} {{{} members}}",
                record.kind,
                record.name_str().unwrap_or("<anonymous>"),
                record.members.len()
            ),
            Details::Field(var) => format!("{} {}", var.typename.short_repr(), var.name),
        }
    }

    /// Merge details of the same kind. `None` if the kinds differ.
    fn update(&mut self, other: &Details) -> Option<Vec<String>> {
        match (self, other) {
            (Details::Function(mine), Details::Function(theirs)) => Some(mine.update(theirs)),
            (Details::Record(mine), Details::Record(theirs)) => Some(mine.update(theirs)),
            (Details::Field(mine), Details::Field(theirs)) => Some(mine.update(theirs)),
            _ => None,
        }
    }
}

/// One resolved symbol-table entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Definition {
    pub name: String,
    pub scope: Scope,
    /// Byte offset of the name in the scope's file.
    pub offset: usize,
    pub module: String,
    /// `None` when no sighting specified visibility; reads as public.
    pub is_private: Option<bool>,
    pub details: Details,
    pub pre_comments: Vec<Token>,
    pub post_comments: Vec<Token>,
}

impl Definition {
    pub fn new(name: impl Into<String>, scope: Scope, offset: usize, visibility: Visibility, details: Details) -> Self {
        let pre_comments = details.pre_comment().cloned().into_iter().collect();
        let post_comments = details.post_comment().cloned().into_iter().collect();
        Definition {
            name: name.into(),
            scope,
            offset,
            module: visibility.module,
            is_private: visibility.is_private,
            details,
            pre_comments,
            post_comments,
        }
    }

    #[inline]
    pub fn kind(&self) -> DefinitionKind {
        self.details.kind()
    }

    #[inline]
    pub fn is_private(&self) -> bool {
        self.is_private == Some(true)
    }

    /// Merge precedence: a body outranks privacy, which outranks the file
    /// priority.
    pub fn priority(&self) -> u32 {
        u32::from(self.details.has_body()) * 100
            + u32::from(self.is_private()) * 10
            + u32::from(self.scope.file.priority)
    }

    pub fn location(&self) -> String {
        self.scope.location(self.offset)
    }

    /// Location with kind, module and name, as printed above a conflict.
    pub fn location_str(&self) -> String {
        if self.module.is_empty() {
            format!("{} {} '{}':", self.location(), self.kind(), self.name)
        } else {
            format!("{} {} [{}] '{}':", self.location(), self.kind(), self.module, self.name)
        }
    }

    pub fn short_repr(&self) -> String {
        format!(
            "{} ({}) {} {} {} {}",
            self.name,
            self.kind(),
            self.location(),
            self.module,
            if self.is_private() { "private" } else { "public" },
            self.details.short_repr()
        )
    }

    /// Fold another sighting of the same name into this one.
    ///
    /// The higher-priority sighting becomes the result; on a tie the
    /// existing one stays. Disagreements are reported to `sink`. Privacy is
    /// merged with OR semantics and comments are concatenated.
    pub fn update(&mut self, mut other: Definition, sink: &DiagnosticSink) {
        // Comments keep sighting order whichever side wins.
        let mut pre_comments = std::mem::take(&mut self.pre_comments);
        pre_comments.append(&mut other.pre_comments);
        let mut post_comments = std::mem::take(&mut self.post_comments);
        post_comments.append(&mut other.post_comments);
        if self.priority() < other.priority() {
            std::mem::swap(self, &mut other);
        }
        self.pre_comments = pre_comments;
        self.post_comments = post_comments;

        if self.kind() != other.kind() {
            sink.conflict(
                WarningKind::KIND_MISMATCH,
                self.location_str(),
                "'kind'",
                other.location_str(),
                [
                    format!("kind mismatch for '{}': {} != {}", self.name, self.kind(), other.kind()),
                    self.short_repr(),
                    other.short_repr(),
                ],
            );
        }
        if self.module != other.module {
            sink.conflict(
                WarningKind::MODULE_MISMATCH,
                self.location_str(),
                "'module'",
                other.location_str(),
                [
                    format!(
                        "module mismatch for {} '{}': {} != {}",
                        self.kind(),
                        self.name,
                        self.module,
                        other.module
                    ),
                    self.short_repr(),
                    other.short_repr(),
                ],
            );
        }
        self.is_private = match (self.is_private, other.is_private) {
            (Some(true), _) | (_, Some(true)) => Some(true),
            (None, theirs) => theirs,
            (mine, _) => mine,
        };
        if let Some(errors) = self.details.update(&other.details) {
            if !errors.is_empty() {
                sink.conflict(
                    WarningKind::DETAILS_MISMATCH,
                    self.location_str(),
                    "details",
                    other.location_str(),
                    errors,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests;
