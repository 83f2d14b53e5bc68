//! Pluggable memoization of per-file scan results.
//!
//! A [`ScanCache`] maps a key (the file's path relative to the project
//! root) to opaque bytes. An entry is fresh when it was stored no earlier
//! than one second before the source's modification time. [`cached`] wraps
//! any computation whose result implements [`Cacheable`].

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{trace, warn};

use crate::ScanError;

/// Modification-time slack between a source and its cache entry.
pub const MTIME_TOLERANCE: Duration = Duration::from_secs(1);

fn is_fresh(stored: SystemTime, freshness: SystemTime) -> bool {
    freshness <= stored + MTIME_TOLERANCE
}

/// Key-value store for scan results.
pub trait ScanCache: Send + Sync + fmt::Debug {
    /// The bytes stored under `key`, if they are fresh for a source last
    /// modified at `freshness`.
    fn lookup(&self, key: &str, freshness: SystemTime) -> Option<Vec<u8>>;

    fn store(&self, key: &str, bytes: &[u8]) -> Result<(), ScanError>;
}

/// Values that can round-trip through a [`ScanCache`].
pub trait Cacheable: Sized {
    fn to_bytes(&self) -> Result<Vec<u8>, ScanError>;

    fn from_bytes(bytes: &[u8]) -> Result<Self, ScanError>;
}

/// Return the cached value for `key`, or run `compute` and store its
/// result. Unreadable entries are recomputed; failing stores are logged.
pub fn cached<T: Cacheable>(
    cache: &dyn ScanCache,
    key: &str,
    freshness: SystemTime,
    compute: impl FnOnce() -> Result<T, ScanError>,
) -> Result<T, ScanError> {
    if let Some(bytes) = cache.lookup(key, freshness) {
        match T::from_bytes(&bytes) {
            Ok(value) => {
                trace!(key, "scan cache hit");
                return Ok(value);
            }
            Err(err) => trace!(key, %err, "discarding unreadable cache entry"),
        }
    } else {
        trace!(key, "scan cache miss");
    }
    let value = compute()?;
    if let Err(err) = value.to_bytes().and_then(|bytes| cache.store(key, &bytes)) {
        warn!(key, %err, "cannot store scan cache entry");
    }
    Ok(value)
}

/// In-process cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<FxHashMap<String, (SystemTime, Vec<u8>)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl ScanCache for MemoryCache {
    fn lookup(&self, key: &str, freshness: SystemTime) -> Option<Vec<u8>> {
        let entries = self.entries.lock();
        let (stored, bytes) = entries.get(key)?;
        is_fresh(*stored, freshness).then(|| bytes.clone())
    }

    fn store(&self, key: &str, bytes: &[u8]) -> Result<(), ScanError> {
        self.entries
            .lock()
            .insert(key.to_owned(), (SystemTime::now(), bytes.to_vec()));
        Ok(())
    }
}

/// Cache files under `<root>/build/.parsecache/`, one per key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub const DIR: &'static str = ".parsecache";

    pub fn new(root: &Path) -> Self {
        DiskCache {
            dir: root.join("build").join(Self::DIR),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Entry file for `key`. Absolute keys are rooted under the cache
    /// directory.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let relative = key.trim_start_matches(|c| c == '/' || c == '\\');
        self.dir.join(format!("{relative}.scan"))
    }

    /// Remove every entry.
    pub fn clear(&self) -> Result<(), ScanError> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ScanError::read(&self.dir, err)),
        }
    }
}

impl ScanCache for DiskCache {
    fn lookup(&self, key: &str, freshness: SystemTime) -> Option<Vec<u8>> {
        let path = self.entry_path(key);
        let stored = fs::metadata(&path).and_then(|meta| meta.modified()).ok()?;
        if !is_fresh(stored, freshness) {
            return None;
        }
        fs::read(&path).ok()
    }

    fn store(&self, key: &str, bytes: &[u8]) -> Result<(), ScanError> {
        let path = self.entry_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| ScanError::cache(key, err))?;
        }
        fs::write(&path, bytes).map_err(|err| ScanError::cache(key, err))
    }
}
