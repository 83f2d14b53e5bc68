//! Symbol table of a C codebase for module-boundary checks.
//!
//! Walks the statements of every source file, extracts functions, records,
//! fields, typedefs and macros, resolves which module owns each symbol and
//! whether it is private to that module, and merges repeated sightings
//! across files into one [`Codebase`].
//!
//! ```text
//! let config = Arc::new(ModuleConfig::new(root).with_module(Module::new("btree")));
//! let sink = DiagnosticSink::new(DiagnosticConfig::checker());
//! let files = config.discover_files()?;
//! let codebase = scan_files(&files, &config, &sink, &ScanOptions::default());
//! ```

mod cache;
mod codebase;
mod definition;
mod error;
mod scan;
mod scope;
mod visibility;
mod workspace;

pub use cache::{cached, Cacheable, DiskCache, MemoryCache, ScanCache, MTIME_TOLERANCE};
pub use codebase::Codebase;
pub use definition::{Definition, DefinitionKind, Details};
pub use error::ScanError;
#[cfg(feature = "cache")]
pub use scan::FileScan;
pub use scan::{scan_file, scan_files, ScanOptions};
pub use scope::{FileInfo, ScanContext, Scope};
pub use visibility::{parse_annotation, resolve, Annotation, Visibility};
pub use workspace::{ExtraMacro, Module, ModuleConfig, NamingConvention};
