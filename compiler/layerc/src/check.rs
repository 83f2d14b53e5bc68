//! `layerc check`: scan a project and report what the scan found.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use layerc_codebase::{
    scan_files, Codebase, DiskCache, Module, ModuleConfig, ScanError, ScanOptions,
};
use layerc_diagnostic::{DiagnosticConfig, DiagnosticSink, Warning};
use tracing::debug;

use crate::CheckOptions;

/// Exit statuses of the `layerc` binary.
pub mod exit {
    pub const OK: i32 = 0;
    /// The scan recorded errors.
    pub const ERRORS: i32 = 1;
    pub const USAGE: i32 = 2;
    /// The run could not complete (unreadable root, closed output pipe).
    pub const FATAL: i32 = 3;
}

/// Outcome of a check run.
#[derive(Debug)]
pub struct CheckReport {
    pub files: usize,
    pub codebase: Codebase,
    /// Diagnostics ordered by location.
    pub warnings: Vec<Warning>,
    pub errors: usize,
}

impl CheckReport {
    pub fn exit_code(&self) -> i32 {
        if self.errors > 0 {
            exit::ERRORS
        } else {
            exit::OK
        }
    }
}

/// Every directory directly under `src` is a module of the same name.
fn default_modules(source_dir: &Path) -> Result<Vec<Module>, ScanError> {
    let entries = fs::read_dir(source_dir).map_err(|err| ScanError::read(source_dir, err))?;
    let mut modules = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| ScanError::read(source_dir, err))?;
        let is_dir = entry.file_type().is_ok_and(|kind| kind.is_dir());
        if let (true, Some(name)) = (is_dir, entry.file_name().to_str()) {
            modules.push(Module::new(name));
        }
    }
    modules.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(modules)
}

pub fn module_config(options: &CheckOptions) -> Result<ModuleConfig, ScanError> {
    let mut config = ModuleConfig::new(&options.root);
    config.modules = if options.modules.is_empty() {
        default_modules(&config.source_dir())?
    } else {
        options.modules.clone()
    };
    config.extra_files.clone_from(&options.extra_files);
    config.extra_macros.clone_from(&options.extra_macros);
    Ok(config)
}

/// Scan the project described by `options`.
pub fn run_check(options: &CheckOptions) -> Result<CheckReport, ScanError> {
    let config = Arc::new(module_config(options)?);
    debug!(root = %config.root.display(), modules = config.modules.len(), "checking");

    let disk_cache = DiskCache::new(&config.root);
    if options.clear_cache {
        disk_cache.clear()?;
    }
    let mut scan_options = ScanOptions {
        parallel: options.parallel,
        threads: options.threads,
        cache: None,
    };
    if options.cache {
        scan_options = scan_options.with_cache(Arc::new(disk_cache));
    }

    let diagnostics = if options.warn_module_mismatch {
        DiagnosticConfig::default()
    } else {
        DiagnosticConfig::checker()
    };
    let sink = DiagnosticSink::new(diagnostics);
    let files = config.discover_files()?;
    let codebase = scan_files(&files, &config, &sink, &scan_options);

    Ok(CheckReport {
        files: files.len(),
        codebase,
        warnings: sink.take_sorted(),
        errors: sink.error_count(),
    })
}

/// Per-module count of public and private definitions.
fn module_counts(codebase: &Codebase) -> Vec<(String, usize, usize)> {
    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    let fields = codebase.fields.values().flat_map(|fields| fields.values());
    for def in codebase.types.values().chain(codebase.names.values()).chain(fields) {
        let entry = counts.entry(def.module.as_str()).or_default();
        if def.is_private() {
            entry.1 += 1;
        } else {
            entry.0 += 1;
        }
    }
    counts
        .into_iter()
        .map(|(module, (public, private))| (module.to_owned(), public, private))
        .collect()
}

/// Print the diagnostics and a summary.
pub fn print_report(report: &CheckReport, verbose: bool, out: &mut impl Write) -> io::Result<()> {
    for warning in &report.warnings {
        writeln!(out, "{warning}")?;
    }
    let codebase = &report.codebase;
    if verbose {
        for (module, public, private) in module_counts(codebase) {
            let module = if module.is_empty() { "<none>" } else { module.as_str() };
            writeln!(out, "module {module}: {public} public, {private} private")?;
        }
    }
    let fields: usize = codebase.fields.values().map(|fields| fields.len()).sum();
    writeln!(
        out,
        "scanned {} files: {} types, {} functions, {} fields, {} typedefs, {} macros",
        report.files,
        codebase.types.len(),
        codebase.names.len(),
        fields,
        codebase.typedefs.len(),
        codebase.macros.len()
    )?;
    let warnings = report.warnings.iter().filter(|w| w.location.is_some()).count();
    writeln!(out, "{} errors, {} diagnostics", report.errors, warnings)?;
    out.flush()
}

#[cfg(test)]
mod tests;
