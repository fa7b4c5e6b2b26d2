use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// An encoded image payload plus its format metadata.
///
/// The orchestration layer never looks inside `data`; bytes flow from the
/// [`DataSource`](crate::DataSource) through the
/// [`Transformer`](crate::Transformer) into the
/// [`CacheStore`](crate::CacheStore) unchanged.
#[derive(Clone, Debug)]
pub struct Binary {
    /// Raw encoded bytes, shared so stores can hold a copy cheaply.
    pub data: Arc<Vec<u8>>,
    /// MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
    /// Encoder format name, e.g. `jpeg` or `webp`.
    pub format: String,
}

impl Binary {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            data: Arc::new(data),
            mime_type: mime_type.into(),
            format: format.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One ad hoc filter override supplied per request, layered on top of a named
/// filter's pipeline. Order within a set is significant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuntimeFilter {
    /// Filter step name, e.g. `thumbnail`.
    pub name: String,
    /// Step parameters; `null` means "no overrides".
    #[serde(default)]
    pub params: serde_json::Value,
}

impl RuntimeFilter {
    pub fn new(name: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// Per-application options handed to [`Transformer::apply`](crate::Transformer::apply).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplyOptions {
    /// Ordered runtime overrides composed on top of the named filter.
    pub runtime_filters: Vec<RuntimeFilter>,
    /// Encoder quality override (0-100), if any.
    pub quality: Option<u8>,
    /// Output format override, e.g. `webp`, if any.
    pub format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_clone_shares_bytes() {
        let a = Binary::new(vec![1, 2, 3], "image/png", "png");
        let b = a.clone();
        assert!(Arc::ptr_eq(&a.data, &b.data));
        assert_eq!(b.len(), 3);
        assert!(!b.is_empty());
    }

    #[test]
    fn runtime_filter_params_default_to_null() {
        let f: RuntimeFilter = serde_json::from_str(r#"{"name":"thumbnail"}"#).unwrap();
        assert_eq!(f.name, "thumbnail");
        assert!(f.params.is_null());
    }
}
