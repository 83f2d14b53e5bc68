//! Where a definition was found, and the context threaded through a scan.
//!
//! A [`ScanContext`] is created per file and copied on every push; nothing
//! about the current position lives in shared state. The only shared part
//! is the diagnostics sink, which synchronizes internally.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use layerc_diagnostic::DiagnosticSink;
use layerc_lexer::line_starts;

use crate::ModuleConfig;

/// A scanned file as seen by diagnostics.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FileInfo {
    pub path: String,
    pub module: String,
    pub priority: u8,
    len: usize,
    line_starts: Vec<usize>,
}

impl FileInfo {
    pub fn new(path: impl Into<String>, module: impl Into<String>, priority: u8, text: &str) -> Self {
        FileInfo {
            path: path.into(),
            module: module.into(),
            priority,
            len: text.len(),
            line_starts: line_starts(text),
        }
    }

    /// 1-based line and column of byte `offset`.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let start = self.line_starts.get(line.saturating_sub(1)).copied().unwrap_or(0);
        (line.max(1), offset.saturating_sub(start) + 1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The file plus the start offsets of the fragments (e.g. `extern "C"`
/// bodies) being re-parsed within it, innermost last.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Scope {
    pub file: Arc<FileInfo>,
    pub nested: Vec<usize>,
}

impl Scope {
    pub fn new(file: Arc<FileInfo>) -> Self {
        Scope {
            file,
            nested: Vec::new(),
        }
    }

    /// `path:line:col` of `offset`. Offsets past the end of the file fall
    /// back to the innermost fragment start.
    pub fn location(&self, offset: usize) -> String {
        let offset = if offset > self.file.len() {
            self.nested.last().copied().unwrap_or(0)
        } else {
            offset
        };
        let (line, col) = self.file.line_col(offset);
        format!("{}:{line}:{col}", self.file.path)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file.path)?;
        for offset in &self.nested {
            let (line, col) = self.file.line_col(*offset);
            write!(f, " > {line}:{col}")?;
        }
        Ok(())
    }
}

/// Per-scan state: the current scope, the shared sink and the project
/// configuration.
#[derive(Clone, Debug)]
pub struct ScanContext {
    pub scope: Scope,
    pub sink: DiagnosticSink,
    pub config: Arc<ModuleConfig>,
}

impl ScanContext {
    pub fn new(file: Arc<FileInfo>, sink: DiagnosticSink, config: Arc<ModuleConfig>) -> Self {
        ScanContext {
            scope: Scope::new(file),
            sink,
            config,
        }
    }

    /// Context for `text` read from `path`, with the module and priority
    /// the configuration assigns to that path.
    pub fn for_file(path: &Path, text: &str, sink: DiagnosticSink, config: Arc<ModuleConfig>) -> Self {
        let file = FileInfo::new(
            path.display().to_string(),
            config.module_of(path),
            config.file_priority(path),
            text,
        );
        Self::new(Arc::new(file), sink, config)
    }

    /// A copy of this context for a fragment starting at `offset`.
    #[must_use]
    pub fn nested(&self, offset: usize) -> ScanContext {
        let mut inner = self.clone();
        inner.scope.nested.push(offset);
        inner
    }

    /// Module of the file being scanned.
    #[inline]
    pub fn module(&self) -> &str {
        &self.scope.file.module
    }

    pub fn location(&self, offset: usize) -> String {
        self.scope.location(offset)
    }
}

#[cfg(test)]
mod tests;
