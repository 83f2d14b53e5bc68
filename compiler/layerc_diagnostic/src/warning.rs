//! Warning records.

use std::fmt;

use bitflags::bitflags;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

bitflags! {
    /// Categories of diagnostics. Also used as a set of enabled categories.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
    pub struct WarningKind: u16 {
        /// Two sightings of a name disagree on what kind of symbol it is.
        const KIND_MISMATCH = 1 << 0;
        /// Two sightings of a name are assigned to different modules.
        const MODULE_MISMATCH = 1 << 1;
        /// Two sightings disagree on signature, members or body.
        const DETAILS_MISMATCH = 1 << 2;
        /// An annotation and a naming prefix name different modules.
        const AMBIGUOUS_VISIBILITY = 1 << 3;
        /// A macro invocation could not be expanded.
        const MACRO_EXPANSION = 1 << 4;
        /// A file could not be read or cached.
        const IO = 1 << 5;
        /// A private symbol is used outside its module.
        const ACCESS = 1 << 6;
    }
}

impl WarningKind {
    /// Short name used in printed diagnostics.
    pub fn name(self) -> &'static str {
        const NAMES: [(WarningKind, &str); 7] = [
            (WarningKind::KIND_MISMATCH, "kind-mismatch"),
            (WarningKind::MODULE_MISMATCH, "module-mismatch"),
            (WarningKind::DETAILS_MISMATCH, "details-mismatch"),
            (WarningKind::AMBIGUOUS_VISIBILITY, "ambiguous-visibility"),
            (WarningKind::MACRO_EXPANSION, "macro-expansion"),
            (WarningKind::IO, "io"),
            (WarningKind::ACCESS, "access"),
        ];
        NAMES
            .iter()
            .find(|(kind, _)| *kind == self)
            .map_or("mixed", |(_, name)| name)
    }
}

/// One diagnostic record: where, what, and how bad.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Warning {
    pub severity: Severity,
    pub kind: WarningKind,
    /// `file:line:col` plus context, or `None` for follow-up lines of a
    /// multi-part message.
    pub location: Option<String>,
    pub message: String,
}

impl Warning {
    pub fn warning(kind: WarningKind, location: Option<String>, message: impl Into<String>) -> Self {
        Warning {
            severity: Severity::Warning,
            kind,
            location,
            message: message.into(),
        }
    }

    pub fn error(kind: WarningKind, location: Option<String>, message: impl Into<String>) -> Self {
        Warning {
            severity: Severity::Error,
            kind,
            location,
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{location} {}: {}", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}
