use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::SystemTime,
};

use crate::{error::DashboardError, sources::Source};

struct CacheEntry<T> {
    modified: SystemTime,
    value: Arc<T>,
}

/// Loaded tables keyed by source path, valid while the file's modification
/// time is unchanged.
pub struct FileCache<T> {
    entries: Mutex<HashMap<PathBuf, CacheEntry<T>>>,
}

impl<T> Default for FileCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> FileCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, CacheEntry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached value for `source`, reloading when the file changed.
    ///
    /// Entries are keyed by canonical path, so aliases of one file share an
    /// entry. A missing file drops any stale entry and yields `DataUnavailable`.
    pub fn get<S: Source<T>>(&self, source: &S) -> Result<Arc<T>, DashboardError> {
        let path = source.path();
        let stat = fs::canonicalize(path).and_then(|key| {
            let modified = fs::metadata(&key)?.modified()?;
            Ok((key, modified))
        });
        let (key, modified) = match stat {
            Ok(stat) => stat,
            Err(e) => {
                self.lock().retain(|key, _| key.exists());
                tracing::warn!(path = %path.display(), error = %e, "cannot stat source file");
                return Err(DashboardError::DataUnavailable {
                    path: path.display().to_string(),
                });
            }
        };

        if let Some(entry) = self.lock().get(&key) {
            if entry.modified == modified {
                metrics::counter!("dashboard_table_cache_hits_total").increment(1);
                return Ok(Arc::clone(&entry.value));
            }
        }

        metrics::counter!("dashboard_table_cache_misses_total").increment(1);
        let value = match source.load() {
            Ok(v) => Arc::new(v),
            Err(e) => {
                metrics::counter!("dashboard_table_load_errors_total").increment(1);
                return Err(e);
            }
        };
        self.lock().insert(
            key,
            CacheEntry {
                modified,
                value: Arc::clone(&value),
            },
        );
        tracing::debug!(path = %path.display(), "table cache refreshed");
        Ok(value)
    }

    /// Drop the entry for `path`. Returns whether one was present.
    pub fn invalidate(&self, path: &Path) -> bool {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.lock().remove(&key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        path: PathBuf,
        loads: AtomicUsize,
    }

    impl Source<usize> for CountingSource {
        fn path(&self) -> &Path {
            &self.path
        }

        fn load(&self) -> Result<usize, DashboardError> {
            Ok(self.loads.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    fn source_for(file: &tempfile::NamedTempFile) -> CountingSource {
        CountingSource {
            path: file.path().to_path_buf(),
            loads: AtomicUsize::new(0),
        }
    }

    #[test]
    fn unchanged_file_is_loaded_once() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let source = source_for(&file);
        let cache = FileCache::new();

        assert_eq!(*cache.get(&source).unwrap(), 1);
        assert_eq!(*cache.get(&source).unwrap(), 1);
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn modified_file_is_reloaded() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let source = source_for(&file);
        let cache = FileCache::new();
        cache.get(&source).unwrap();

        let later = SystemTime::now() + std::time::Duration::from_secs(60);
        file.as_file().set_modified(later).unwrap();

        assert_eq!(*cache.get(&source).unwrap(), 2);
    }

    #[test]
    fn explicit_invalidation_forces_reload() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let source = source_for(&file);
        let cache = FileCache::new();
        cache.get(&source).unwrap();

        assert!(cache.invalidate(file.path()));
        assert!(cache.is_empty());
        assert_eq!(*cache.get(&source).unwrap(), 2);
    }

    #[test]
    fn deleted_file_drops_entry() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let source = source_for(&file);
        let cache = FileCache::new();
        cache.get(&source).unwrap();

        file.close().unwrap();

        assert!(matches!(
            cache.get(&source),
            Err(DashboardError::DataUnavailable { .. })
        ));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn aliases_of_one_file_share_an_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let direct = dir.path().join("readings.csv");
        fs::write(&direct, "x").unwrap();

        let cache = FileCache::new();
        let plain = CountingSource {
            path: direct.clone(),
            loads: AtomicUsize::new(0),
        };
        let aliased = CountingSource {
            path: dir.path().join("sub").join("..").join("readings.csv"),
            loads: AtomicUsize::new(0),
        };

        cache.get(&plain).unwrap();
        cache.get(&aliased).unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(aliased.loads.load(Ordering::SeqCst), 0);
        assert!(cache.invalidate(&aliased.path));
        assert!(cache.is_empty());
    }
}
