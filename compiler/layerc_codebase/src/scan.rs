//! File-level parallel scanning.
//!
//! Each file is scanned into its own partial [`Codebase`] with no shared
//! mutable state besides the diagnostics sink. Partial codebases are then
//! merged one by one in input order, so the result does not depend on how
//! the work was scheduled.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use layerc_diagnostic::{DiagnosticSink, WarningKind};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{Codebase, ModuleConfig, ScanCache, ScanError};

/// How a scan is run.
#[derive(Clone)]
pub struct ScanOptions {
    /// Scan files on a thread pool.
    pub parallel: bool,
    /// Pool size; 0 lets rayon decide.
    pub threads: usize,
    pub cache: Option<Arc<dyn ScanCache>>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            parallel: true,
            threads: 0,
            cache: None,
        }
    }
}

impl fmt::Debug for ScanOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanOptions")
            .field("parallel", &self.parallel)
            .field("threads", &self.threads)
            .field("cache", &self.cache.is_some())
            .finish()
    }
}

impl ScanOptions {
    pub fn sequential() -> Self {
        ScanOptions {
            parallel: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ScanCache>) -> Self {
        self.cache = Some(cache);
        self
    }
}

/// Cache key of `path`: relative to the project root when inside it.
fn cache_key(path: &Path, config: &ModuleConfig) -> String {
    path.strip_prefix(&config.root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// Scan one file into a fresh partial codebase.
pub fn scan_file(
    path: &Path,
    config: &Arc<ModuleConfig>,
    sink: &DiagnosticSink,
    options: &ScanOptions,
) -> Result<Codebase, ScanError> {
    if let Some(cache) = options.cache.as_deref() {
        #[cfg(feature = "cache")]
        {
            if let Ok(modified) = std::fs::metadata(path).and_then(|meta| meta.modified()) {
                let key = cache_key(path, config);
                let scan = crate::cache::cached(cache, &key, modified, || {
                    FileScan::run(path, config, sink)
                })?;
                return Ok(scan.replay(sink));
            }
        }
        #[cfg(not(feature = "cache"))]
        debug!(?cache, key = %cache_key(path, config), "scan cache ignored without the cache feature");
    }
    let mut codebase = Codebase::new();
    codebase.update_from_file(path, sink, config)?;
    Ok(codebase)
}

/// Scan `paths` and merge the results in input order. Extra macros from
/// `config` are registered first. Unreadable files are reported to `sink`
/// and skipped.
pub fn scan_files(
    paths: &[PathBuf],
    config: &Arc<ModuleConfig>,
    sink: &DiagnosticSink,
    options: &ScanOptions,
) -> Codebase {
    debug!(files = paths.len(), parallel = options.parallel, "scanning");
    let scan_one = |path: &PathBuf| scan_file(path, config, sink, options);

    let partials: Vec<Result<Codebase, ScanError>> = if options.parallel && paths.len() > 1 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| paths.par_iter().map(scan_one).collect())
            })
            .unwrap_or_else(|err| {
                warn!("failed to create thread pool ({err}), scanning sequentially");
                paths.iter().map(scan_one).collect()
            })
    } else {
        paths.iter().map(scan_one).collect()
    };

    let mut codebase = Codebase::new();
    config.register_extra_macros(&mut codebase.macros);
    for partial in partials {
        match partial {
            Ok(partial) => codebase.merge(partial, sink),
            Err(err) => {
                let location = match &err {
                    ScanError::Read { path, .. } => Some(path.display().to_string()),
                    ScanError::Cache { key, .. } => Some(key.clone()),
                };
                sink.error(WarningKind::IO, location, err.to_string());
            }
        }
    }
    debug!(
        types = codebase.types.len(),
        names = codebase.names.len(),
        typedefs = codebase.typedefs.len(),
        macros = codebase.macros.len(),
        "scan finished"
    );
    codebase
}

/// A file's scan result together with the diagnostics it produced, as
/// stored in the scan cache.
#[cfg(feature = "cache")]
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct FileScan {
    pub codebase: Codebase,
    pub warnings: Vec<Vec<layerc_diagnostic::Warning>>,
}

#[cfg(feature = "cache")]
impl FileScan {
    /// Scan `path`, capturing its diagnostics instead of emitting them.
    pub fn run(path: &Path, config: &Arc<ModuleConfig>, sink: &DiagnosticSink) -> Result<Self, ScanError> {
        let local = DiagnosticSink::new(sink.config().clone());
        let mut codebase = Codebase::new();
        codebase.update_from_file(path, &local, config)?;
        Ok(FileScan {
            codebase,
            warnings: local.take_groups(),
        })
    }

    /// Emit the captured diagnostics to `sink` and hand out the codebase.
    pub fn replay(self, sink: &DiagnosticSink) -> Codebase {
        for group in self.warnings {
            sink.emit_group(group);
        }
        self.codebase
    }
}

#[cfg(feature = "cache")]
impl crate::Cacheable for FileScan {
    fn to_bytes(&self) -> Result<Vec<u8>, ScanError> {
        bincode::serialize(self).map_err(|err| ScanError::cache("file scan", err))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, ScanError> {
        bincode::deserialize(bytes).map_err(|err| ScanError::cache("file scan", err))
    }
}
