//! Shared, synchronized diagnostics sink.
//!
//! Every file scan holds a clone of the same sink; clones share one record
//! list and one error tally. Records arrive in whatever order the worker
//! threads produce them, so [`DiagnosticSink::take_sorted`] orders them by
//! location before printing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Severity, Warning, WarningKind};

/// Configuration for diagnostic collection.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Categories that are recorded; others are dropped (errors included).
    pub enabled: WarningKind,
    /// Maximum number of record groups kept (0 = unlimited). Tallies keep
    /// counting past the limit.
    pub limit: usize,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            enabled: WarningKind::all(),
            limit: 0,
        }
    }
}

impl DiagnosticConfig {
    /// Everything except module-name mismatches, which are noisy when
    /// prototypes live in shared headers.
    pub fn checker() -> Self {
        DiagnosticConfig {
            enabled: WarningKind::all() - WarningKind::MODULE_MISMATCH,
            limit: 0,
        }
    }
}

#[derive(Debug)]
struct Inner {
    config: DiagnosticConfig,
    records: Mutex<Vec<Vec<Warning>>>,
    errors: AtomicUsize,
    warnings: AtomicUsize,
}

/// Cloneable handle to a shared diagnostics collection.
#[derive(Clone, Debug)]
pub struct DiagnosticSink {
    inner: Arc<Inner>,
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new(DiagnosticConfig::default())
    }
}

impl DiagnosticSink {
    pub fn new(config: DiagnosticConfig) -> Self {
        DiagnosticSink {
            inner: Arc::new(Inner {
                config,
                records: Mutex::new(Vec::new()),
                errors: AtomicUsize::new(0),
                warnings: AtomicUsize::new(0),
            }),
        }
    }

    #[inline]
    pub fn config(&self) -> &DiagnosticConfig {
        &self.inner.config
    }

    /// Returns `true` if records of `kind` are collected.
    #[inline]
    pub fn is_enabled(&self, kind: WarningKind) -> bool {
        self.inner.config.enabled.intersects(kind)
    }

    /// Record a diagnostic. Returns `false` if its category is disabled.
    pub fn emit(&self, warning: Warning) -> bool {
        self.emit_group(vec![warning])
    }

    /// Record diagnostics that belong together; they stay adjacent when
    /// sorted. The category of the first record decides whether the group
    /// is kept.
    pub fn emit_group(&self, group: Vec<Warning>) -> bool {
        let Some(first) = group.first() else {
            return false;
        };
        if !self.is_enabled(first.kind) {
            return false;
        }
        for warning in &group {
            match warning.severity {
                Severity::Error => {
                    self.inner.errors.fetch_add(1, Ordering::Relaxed);
                }
                Severity::Warning => {
                    self.inner.warnings.fetch_add(1, Ordering::Relaxed);
                }
                Severity::Note => {}
            }
            tracing::trace!(kind = warning.kind.name(), "{warning}");
        }
        let mut records = self.inner.records.lock();
        if self.inner.config.limit == 0 || records.len() < self.inner.config.limit {
            records.push(group);
        }
        true
    }

    pub fn warn(&self, kind: WarningKind, location: Option<String>, message: impl Into<String>) {
        self.emit(Warning::warning(kind, location, message));
    }

    pub fn error(&self, kind: WarningKind, location: Option<String>, message: impl Into<String>) {
        self.emit(Warning::error(kind, location, message));
    }

    /// Record a conflict between two sightings: one line per side plus the
    /// detailed messages.
    pub fn conflict(
        &self,
        kind: WarningKind,
        this: String,
        what: &str,
        other: String,
        messages: impl IntoIterator<Item = String>,
    ) {
        let mut group = vec![
            Warning::warning(kind, Some(this), format!("conflicting update for {what}:")),
            Warning::warning(kind, Some(other), "conflict here:"),
        ];
        group.extend(messages.into_iter().map(|m| Warning::warning(kind, None, m)));
        self.emit_group(group);
    }

    /// Number of errors recorded so far, across all clones.
    #[inline]
    pub fn error_count(&self) -> usize {
        self.inner.errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn warning_count(&self) -> usize {
        self.inner.warnings.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Copy of the records collected so far, in arrival order.
    pub fn snapshot(&self) -> Vec<Warning> {
        self.inner.records.lock().iter().flatten().cloned().collect()
    }

    /// Drain the record groups in arrival order. Tallies are not reset.
    pub fn take_groups(&self) -> Vec<Vec<Warning>> {
        std::mem::take(&mut *self.inner.records.lock())
    }

    /// Drain the records, ordered by the location of the first record of
    /// each group. Tallies are not reset.
    pub fn take_sorted(&self) -> Vec<Warning> {
        let mut groups = std::mem::take(&mut *self.inner.records.lock());
        groups.sort_by(|a, b| group_key(a).cmp(&group_key(b)));
        groups.into_iter().flatten().collect()
    }
}

fn group_key(group: &[Warning]) -> Option<(&str, u32, u32)> {
    group.first()?.location.as_deref().map(location_key)
}

/// `path:line:col` split into a key that orders lines numerically.
/// Locations of any other shape sort by their text, before line 1.
fn location_key(location: &str) -> (&str, u32, u32) {
    let mut parts = location.rsplitn(3, ':');
    let (col, line, path) = (parts.next(), parts.next(), parts.next());
    match (path, line.and_then(|l| l.parse().ok()), col.and_then(|c| c.parse().ok())) {
        (Some(path), Some(line), Some(col)) => (path, line, col),
        _ => (location, 0, 0),
    }
}
