use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::cache::{CacheStore, encode_runtime_path};
use crate::error::{VignetteError, VignetteResult};
use crate::model::{Binary, RuntimeFilter};

#[derive(Clone, Debug)]
struct Target {
    root: PathBuf,
    base_url: String,
}

/// Filesystem-backed cache store.
///
/// Artifacts live at `{root}/{filter}/{path}` and resolve to
/// `{base_url}/{filter}/{path}`. A resolver name selects an alternative
/// (root, base_url) target registered via [`FsCacheStore::with_resolver`];
/// naming an unregistered resolver is a cache backend error.
#[derive(Debug)]
pub struct FsCacheStore {
    default_target: Target,
    resolvers: HashMap<String, Target>,
}

impl FsCacheStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            default_target: Target {
                root: root.into(),
                base_url: base_url.into(),
            },
            resolvers: HashMap::new(),
        }
    }

    /// Register an additional storage target selectable by resolver name.
    pub fn with_resolver(
        mut self,
        name: impl Into<String>,
        root: impl Into<PathBuf>,
        base_url: impl Into<String>,
    ) -> Self {
        self.resolvers.insert(
            name.into(),
            Target {
                root: root.into(),
                base_url: base_url.into(),
            },
        );
        self
    }

    fn target(&self, resolver: Option<&str>) -> VignetteResult<&Target> {
        match resolver {
            None => Ok(&self.default_target),
            Some(name) => self
                .resolvers
                .get(name)
                .ok_or_else(|| VignetteError::cache_backend(format!("unknown resolver \"{name}\""))),
        }
    }

    fn artifact_path(&self, target: &Target, path: &str, filter: &str) -> VignetteResult<PathBuf> {
        let rel = sanitize_rel(path)?;
        Ok(target.root.join(filter).join(rel))
    }
}

/// Normalize a cache path to a safe relative form: forward slashes, no
/// leading separator, no parent-directory components.
fn sanitize_rel(path: &str) -> VignetteResult<String> {
    let unified = path.replace('\\', "/");
    let trimmed = unified.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(VignetteError::cache_backend("empty cache path"));
    }
    if trimmed.split('/').any(|c| c == "..") {
        return Err(VignetteError::cache_backend(format!(
            "cache path escapes store root: \"{path}\""
        )));
    }
    Ok(trimmed.to_string())
}

fn io_err(op: &str, path: &Path, e: std::io::Error) -> VignetteError {
    VignetteError::cache_backend(format!("{op} '{}': {e}", path.display()))
}

impl CacheStore for FsCacheStore {
    fn is_stored(&self, path: &str, filter: &str, resolver: Option<&str>) -> VignetteResult<bool> {
        let target = self.target(resolver)?;
        let file = self.artifact_path(target, path, filter)?;
        file.try_exists().map_err(|e| io_err("stat", &file, e))
    }

    fn resolve(&self, path: &str, filter: &str, resolver: Option<&str>) -> VignetteResult<String> {
        let target = self.target(resolver)?;
        let rel = sanitize_rel(path)?;
        let base = target.base_url.trim_end_matches('/');
        Ok(format!("{base}/{filter}/{rel}"))
    }

    fn store(
        &self,
        binary: &Binary,
        path: &str,
        filter: &str,
        resolver: Option<&str>,
    ) -> VignetteResult<()> {
        let target = self.target(resolver)?;
        let file = self.artifact_path(target, path, filter)?;
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err("create dir", parent, e))?;
        }
        std::fs::write(&file, binary.data.as_slice()).map_err(|e| io_err("write", &file, e))
    }

    fn remove(&self, path: &str, filter: &str) -> VignetteResult<()> {
        // Invalidation targets the default storage only.
        let file = self.artifact_path(&self.default_target, path, filter)?;
        match std::fs::remove_file(&file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err("remove", &file, e)),
        }
    }

    fn runtime_path(&self, path: &str, runtime_filters: &[RuntimeFilter]) -> String {
        encode_runtime_path(path, runtime_filters)
    }
}
