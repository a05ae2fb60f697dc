//! Acquire resource loader
//!
//! This crate resolves resource specifiers to addresses, loads them through
//! host-supplied transports, and caches the results:
//! - Specifier resolution with per-namespace root/index overrides
//! - Process-lifetime content cache keyed by resolved address
//! - Request deduplication: one in-flight fetch per address, shared by every
//!   caller that arrives before it settles
//! - Transport dispatch by extension (script, stylesheet, anything else)
//! - Ordered batch loading and cache preloading
//!
//! ```ignore
//! use acquire::{Acquire, Batch, ReqwestFetcher, Transports};
//! use std::sync::Arc;
//!
//! let http = Arc::new(ReqwestFetcher::new(Some(base_url))?);
//! let acquire = Acquire::with_transports(Transports::new().with_http(http));
//!
//! let schema = acquire.require("app/schema.json").await?;
//! let results = acquire.load(Batch::specifiers(["app/a.json", "app/b.txt"])).await;
//! ```

pub mod address;
pub mod batch;
pub mod cache;
pub mod config;
pub mod content;
pub mod context;
pub mod dedup;
pub mod error;
pub mod loader;
pub mod resolve;
pub mod transport;

pub use address::{ResolvedAddress, ResourceKind};
pub use batch::{Batch, BatchCoordinator};
pub use cache::ContentCache;
pub use config::{ConfigError, LoaderConfig, NamespaceConfig};
pub use content::{ContentValue, ExportedValue};
pub use context::Acquire;
pub use dedup::{BeginFetch, FetchLease, RequestDeduplicator, Waiter};
pub use error::{AcquireError, LoadResult, ResolveError, TransportError};
pub use loader::Loader;
pub use resolve::{resolve, PathResolver};
pub use transport::{
    classify_status, HttpFetcher, PrefetchScriptExecutor, ReqwestFetcher, ScriptExecutor,
    StatusClass, StyleInjector, StyleSheetList, Transports,
};
