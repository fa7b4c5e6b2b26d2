use crate::error::VignetteResult;
use crate::model::{ApplyOptions, Binary};

/// Applies a named transformation pipeline to a binary.
///
/// The named `filter` selects a registered pipeline; `options` layers ordered
/// runtime overrides on top of it and may force an output format and encoder
/// quality. Codec work lives entirely behind this trait.
pub trait Transformer {
    /// Produce a new binary by running `binary` through the `filter` pipeline.
    ///
    /// Fails with [`VignetteError::FilterNotFound`](crate::VignetteError::FilterNotFound)
    /// when `filter` names no registered pipeline.
    fn apply(&self, binary: &Binary, filter: &str, options: &ApplyOptions) -> VignetteResult<Binary>;
}
