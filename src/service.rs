use crate::cache::CacheStore;
use crate::error::{VignetteError, VignetteResult};
use crate::model::{ApplyOptions, Binary, RuntimeFilter};
use crate::source::DataSource;
use crate::transform::Transformer;

const WEBP_SUFFIX: &str = ".webp";
const WEBP_FORMAT: &str = "webp";

/// Process-wide options for [`FilterService`], fixed at construction.
#[derive(Clone, Copy, Debug)]
pub struct FilterServiceOpts {
    /// When true, every cache miss also produces a webp variant stored at
    /// `{path}.webp` alongside the primary artifact.
    pub webp_generate: bool,
    /// Encoder quality injected into webp variants (0-100).
    pub webp_quality: u8,
}

impl Default for FilterServiceOpts {
    fn default() -> Self {
        Self {
            webp_generate: false,
            webp_quality: 80,
        }
    }
}

/// Cache-aside orchestrator for filtered images.
///
/// Guarantees a transformed binary exists in the cache store for a
/// (path, filter) request and returns its URL, computing the binary only on a
/// cache miss: on a hit the stored artifact is trusted and resolved without
/// touching the data source or the transformer. The service itself is
/// stateless between calls and holds no locks; concurrent misses for the same
/// key may both compute and store (stores are overwrite-safe, last one wins).
pub struct FilterService<S, T, C> {
    source: S,
    transformer: T,
    cache: C,
    webp_generate: bool,
    webp_quality: u8,
}

impl<S, T, C> FilterService<S, T, C>
where
    S: DataSource,
    T: Transformer,
    C: CacheStore,
{
    pub fn new(source: S, transformer: T, cache: C, opts: FilterServiceOpts) -> VignetteResult<Self> {
        if opts.webp_quality > 100 {
            return Err(VignetteError::validation(format!(
                "webp quality must be within 0-100, got {}",
                opts.webp_quality
            )));
        }
        Ok(Self {
            source,
            transformer,
            cache,
            webp_generate: opts.webp_generate,
            webp_quality: opts.webp_quality,
        })
    }

    /// Drop the cached artifact for (path, filter) under the default
    /// resolver. Invalidating an absent key is a no-op, not an error.
    pub fn invalidate(&self, path: &str, filter: &str) -> VignetteResult<()> {
        if !self.cache.is_stored(path, filter, None)? {
            return Ok(());
        }
        self.cache.remove(path, filter)
    }

    /// Resolve the URL of the filtered image for `path`, computing and
    /// storing it first if the cache misses.
    ///
    /// With webp generation enabled, a miss eagerly co-produces the webp
    /// variant at `{path}.webp` whether or not `prefer_webp` is set; the flag
    /// only selects which URL is returned.
    pub fn resolve_url(
        &self,
        path: &str,
        filter: &str,
        resolver: Option<&str>,
        prefer_webp: bool,
    ) -> VignetteResult<String> {
        self.resolve_cached(path, path, filter, &[], resolver, prefer_webp)
    }

    /// Like [`resolve_url`](Self::resolve_url), but with ad hoc runtime
    /// filters layered on top of the named filter.
    ///
    /// Cache keys use the runtime path derived by the store from
    /// (path, runtime_filters), so distinct filter sets cache independently;
    /// the data source still loads by the original `path`.
    pub fn resolve_url_with_runtime_filters(
        &self,
        path: &str,
        filter: &str,
        runtime_filters: &[RuntimeFilter],
        resolver: Option<&str>,
        prefer_webp: bool,
    ) -> VignetteResult<String> {
        let effective = self.cache.runtime_path(path, runtime_filters);
        self.resolve_cached(path, &effective, filter, runtime_filters, resolver, prefer_webp)
    }

    #[tracing::instrument(skip(self, runtime_filters))]
    fn resolve_cached(
        &self,
        source_path: &str,
        effective_path: &str,
        filter: &str,
        runtime_filters: &[RuntimeFilter],
        resolver: Option<&str>,
        prefer_webp: bool,
    ) -> VignetteResult<String> {
        if self.cache.is_stored(effective_path, filter, resolver)? {
            return self.cache.resolve(effective_path, filter, resolver);
        }

        let filtered = self.create_filtered_binary(source_path, filter, runtime_filters)?;
        self.cache
            .store(&filtered, effective_path, filter, resolver)?;
        let url = self.cache.resolve(effective_path, filter, resolver)?;

        if self.webp_generate {
            let webp_path = format!("{effective_path}{WEBP_SUFFIX}");
            let webp = self.create_filtered_webp_binary(source_path, filter, runtime_filters)?;
            self.cache.store(&webp, &webp_path, filter, resolver)?;

            if prefer_webp {
                return self.cache.resolve(&webp_path, filter, resolver);
            }
        }

        Ok(url)
    }

    fn create_filtered_binary(
        &self,
        path: &str,
        filter: &str,
        runtime_filters: &[RuntimeFilter],
    ) -> VignetteResult<Binary> {
        let options = ApplyOptions {
            runtime_filters: runtime_filters.to_vec(),
            ..ApplyOptions::default()
        };
        self.load_and_apply(path, filter, &options)
    }

    fn create_filtered_webp_binary(
        &self,
        path: &str,
        filter: &str,
        runtime_filters: &[RuntimeFilter],
    ) -> VignetteResult<Binary> {
        let options = ApplyOptions {
            runtime_filters: runtime_filters.to_vec(),
            quality: Some(self.webp_quality),
            format: Some(WEBP_FORMAT.to_string()),
        };
        self.load_and_apply(path, filter, &options)
    }

    fn load_and_apply(
        &self,
        path: &str,
        filter: &str,
        options: &ApplyOptions,
    ) -> VignetteResult<Binary> {
        let binary = self.source.find(filter, path)?;
        match self.transformer.apply(&binary, filter, options) {
            Err(err @ VignetteError::FilterNotFound { .. }) => {
                tracing::debug!(
                    "could not locate filter \"{filter}\" for path \"{path}\": {err}"
                );
                Err(err)
            }
            other => other,
        }
    }
}
