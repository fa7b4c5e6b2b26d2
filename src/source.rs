use crate::error::VignetteResult;
use crate::model::Binary;

/// Loads the raw bytes of an asset.
///
/// `filter` identifies the pipeline the load is happening for; sources may use
/// it to pick a loader configuration but must not apply any transformation.
pub trait DataSource {
    /// Load the raw binary for `path`.
    ///
    /// Fails with [`VignetteError::AssetNotFound`](crate::VignetteError::AssetNotFound)
    /// when no asset exists at `path`.
    fn find(&self, filter: &str, path: &str) -> VignetteResult<Binary>;
}
