//! Vignette orchestrates an on-demand cache of filtered (transformed) images.
//!
//! Given a logical asset path and a named filter, [`FilterService`] guarantees
//! that a transformed binary exists in a [`CacheStore`] and returns a
//! resolvable URL for it, computing the binary only on a cache miss. Runtime
//! filter overrides can be layered on a named filter per request, and a webp
//! variant can be eagerly co-produced alongside every primary artifact.
//!
//! Asset loading, codec work, and the storage backend live behind the
//! [`DataSource`], [`Transformer`], and [`CacheStore`] traits; this crate
//! ships in-memory implementations for tests plus a filesystem-backed store.
#![forbid(unsafe_code)]

pub mod cache;
pub mod cache_fs;
pub mod cache_mem;
pub mod error;
pub mod model;
pub mod service;
pub mod source;
pub mod transform;

pub use cache::{CacheStore, encode_runtime_path};
pub use cache_fs::FsCacheStore;
pub use cache_mem::{InMemoryCacheStore, InMemoryDataSource};
pub use error::{VignetteError, VignetteResult};
pub use model::{ApplyOptions, Binary, RuntimeFilter};
pub use service::{FilterService, FilterServiceOpts};
pub use source::DataSource;
pub use transform::Transformer;
