//! Diagnostics for layerc.
//!
//! Scanning never fails on questionable input; it records [`Warning`]s
//! instead. Warnings are `{location, message}` records tagged with a
//! [`WarningKind`] so whole categories can be switched off, and a
//! [`Severity`] so the driver can derive the exit status from the error
//! tally kept by the [`DiagnosticSink`].

mod sink;
mod warning;

pub use sink::{DiagnosticConfig, DiagnosticSink};
pub use warning::{Severity, Warning, WarningKind};
