pub type VignetteResult<T> = Result<T, VignetteError>;

#[derive(thiserror::Error, Debug)]
pub enum VignetteError {
    #[error("asset not found: \"{path}\"")]
    AssetNotFound { path: String },

    #[error("non-existing filter \"{filter}\": {message}")]
    FilterNotFound { filter: String, message: String },

    #[error("cache backend error: {0}")]
    CacheBackend(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VignetteError {
    pub fn asset_not_found(path: impl Into<String>) -> Self {
        Self::AssetNotFound { path: path.into() }
    }

    pub fn filter_not_found(filter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FilterNotFound {
            filter: filter.into(),
            message: message.into(),
        }
    }

    pub fn cache_backend(msg: impl Into<String>) -> Self {
        Self::CacheBackend(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
