use std::collections::HashMap;
use std::sync::Mutex;

use crate::cache::{CacheStore, encode_runtime_path};
use crate::error::{VignetteError, VignetteResult};
use crate::model::{Binary, RuntimeFilter};
use crate::source::DataSource;

type Key = (String, String, Option<String>);

/// In-memory cache store for tests and debugging.
///
/// Keys are full (path, filter, resolver) tuples, so the same path/filter
/// under two resolvers are independent entries. URLs take the form
/// `mem://{resolver}/{filter}/{path}`.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<Key, Binary>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts across all resolvers.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a stored artifact, if present.
    pub fn get(&self, path: &str, filter: &str, resolver: Option<&str>) -> Option<Binary> {
        let entries = self.entries.lock().ok()?;
        entries.get(&key(path, filter, resolver)).cloned()
    }

    fn lock(&self) -> VignetteResult<std::sync::MutexGuard<'_, HashMap<Key, Binary>>> {
        self.entries
            .lock()
            .map_err(|_| VignetteError::cache_backend("in-memory store mutex poisoned"))
    }
}

fn key(path: &str, filter: &str, resolver: Option<&str>) -> Key {
    (
        path.to_string(),
        filter.to_string(),
        resolver.map(str::to_string),
    )
}

impl CacheStore for InMemoryCacheStore {
    fn is_stored(&self, path: &str, filter: &str, resolver: Option<&str>) -> VignetteResult<bool> {
        Ok(self.lock()?.contains_key(&key(path, filter, resolver)))
    }

    fn resolve(&self, path: &str, filter: &str, resolver: Option<&str>) -> VignetteResult<String> {
        let target = resolver.unwrap_or("default");
        let path = path.trim_start_matches('/');
        Ok(format!("mem://{target}/{filter}/{path}"))
    }

    fn store(
        &self,
        binary: &Binary,
        path: &str,
        filter: &str,
        resolver: Option<&str>,
    ) -> VignetteResult<()> {
        self.lock()?
            .insert(key(path, filter, resolver), binary.clone());
        Ok(())
    }

    fn remove(&self, path: &str, filter: &str) -> VignetteResult<()> {
        // Drops the key under every resolver.
        self.lock()?.retain(|(p, f, _), _| p != path || f != filter);
        Ok(())
    }

    fn runtime_path(&self, path: &str, runtime_filters: &[RuntimeFilter]) -> String {
        encode_runtime_path(path, runtime_filters)
    }
}

/// In-memory data source for tests and debugging: a fixed path → binary map.
#[derive(Debug, Default)]
pub struct InMemoryDataSource {
    assets: HashMap<String, Binary>,
}

impl InMemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the raw binary served for `path`.
    pub fn insert(&mut self, path: impl Into<String>, binary: Binary) {
        self.assets.insert(path.into(), binary);
    }
}

impl DataSource for InMemoryDataSource {
    fn find(&self, _filter: &str, path: &str) -> VignetteResult<Binary> {
        self.assets
            .get(path)
            .cloned()
            .ok_or_else(|| VignetteError::asset_not_found(path))
    }
}
