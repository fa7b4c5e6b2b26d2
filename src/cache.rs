use xxhash_rust::xxh3::Xxh3;

use crate::error::VignetteResult;
use crate::model::{Binary, RuntimeFilter};

/// Persistent storage and URL resolution for derived artifacts.
///
/// One stored artifact is identified by the tuple (path, filter, resolver);
/// `resolver = None` selects the backend's default target. The orchestrator
/// treats the store as the single source of truth for "already computed":
/// once `is_stored` reports true for a key, the artifact is never recomputed.
pub trait CacheStore {
    /// Pure existence check for (path, filter, resolver).
    fn is_stored(&self, path: &str, filter: &str, resolver: Option<&str>) -> VignetteResult<bool>;

    /// Resolve (path, filter, resolver) to a public URL.
    ///
    /// Deterministic for a given key. The result is undefined when the key is
    /// not stored.
    fn resolve(&self, path: &str, filter: &str, resolver: Option<&str>) -> VignetteResult<String>;

    /// Store `binary` at (path, filter, resolver). Overwrites any previous
    /// artifact for the key; stores are idempotent.
    fn store(
        &self,
        binary: &Binary,
        path: &str,
        filter: &str,
        resolver: Option<&str>,
    ) -> VignetteResult<()>;

    /// Remove the artifact(s) stored for (path, filter). No-op when absent.
    fn remove(&self, path: &str, filter: &str) -> VignetteResult<()>;

    /// Derive the cache path that encodes `runtime_filters` into the key.
    ///
    /// Deterministic, and distinct filter sets must map to distinct paths.
    /// Backends usually delegate to [`encode_runtime_path`].
    fn runtime_path(&self, path: &str, runtime_filters: &[RuntimeFilter]) -> String;
}

/// Default runtime-path encoding: `rc/{digest}/{path}`.
///
/// The digest is a 128-bit xxh3 over a stable serialization of the filter set
/// (count, then each name and params value with object keys in sorted order),
/// so equal sets always produce equal paths and distinct sets collide only
/// with negligible probability. The original path is kept as a readable
/// suffix.
pub fn encode_runtime_path(path: &str, runtime_filters: &[RuntimeFilter]) -> String {
    let mut h = Xxh3::new();
    write_u64(&mut h, runtime_filters.len() as u64);
    for f in runtime_filters {
        write_str(&mut h, &f.name);
        write_json_value(&mut h, &f.params);
    }
    let digest = h.digest128();
    let path = path.trim_start_matches('/');
    format!("rc/{digest:032x}/{path}")
}

fn write_json_value(h: &mut Xxh3, v: &serde_json::Value) {
    match v {
        serde_json::Value::Null => write_u8(h, 0),
        serde_json::Value::Bool(x) => {
            write_u8(h, 1);
            write_u8(h, u8::from(*x));
        }
        serde_json::Value::Number(n) => {
            write_u8(h, 2);
            write_str(h, &n.to_string());
        }
        serde_json::Value::String(s) => {
            write_u8(h, 3);
            write_str(h, s);
        }
        serde_json::Value::Array(items) => {
            write_u8(h, 4);
            write_u64(h, items.len() as u64);
            for item in items {
                write_json_value(h, item);
            }
        }
        serde_json::Value::Object(map) => {
            write_u8(h, 5);
            let mut keys = map.keys().cloned().collect::<Vec<_>>();
            keys.sort();
            write_u64(h, keys.len() as u64);
            for k in keys {
                write_str(h, &k);
                write_json_value(h, &map[&k]);
            }
        }
    }
}

fn write_u8(h: &mut Xxh3, v: u8) {
    h.update(&[v]);
}

fn write_u64(h: &mut Xxh3, v: u64) {
    h.update(&v.to_le_bytes());
}

fn write_str(h: &mut Xxh3, s: &str) {
    write_u64(h, s.len() as u64);
    h.update(s.as_bytes());
}
