//! Loader context
//!
//! [`Acquire`] is the handle callers hold. It is cheap to clone; every clone
//! shares one cache and one set of pending queues, which live as long as the
//! last clone. Tests get isolation by building a fresh context.

use crate::address::ResolvedAddress;
use crate::batch::{Batch, BatchCoordinator};
use crate::cache::ContentCache;
use crate::config::{LoaderConfig, NamespaceConfig};
use crate::content::ContentValue;
use crate::dedup::RequestDeduplicator;
use crate::error::{LoadResult, ResolveError};
use crate::loader::Loader;
use crate::transport::Transports;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct Acquire {
    loader: Arc<Loader>,
}

impl Acquire {
    pub fn new(config: LoaderConfig, transports: Transports) -> Self {
        Self {
            loader: Arc::new(Loader::new(config, transports)),
        }
    }

    /// Context with the default configuration
    pub fn with_transports(transports: Transports) -> Self {
        Self::new(LoaderConfig::default(), transports)
    }

    pub fn loader(&self) -> &Arc<Loader> {
        &self.loader
    }

    pub fn cache(&self) -> &ContentCache {
        self.loader.cache()
    }

    pub fn pending(&self) -> &RequestDeduplicator {
        self.loader.pending()
    }

    pub fn config(&self) -> LoaderConfig {
        self.loader.config()
    }

    /// Soft-merge namespace overrides; later calls replace only the
    /// namespaces they mention
    pub fn configure<I, K>(&self, namespaces: I)
    where
        I: IntoIterator<Item = (K, NamespaceConfig)>,
        K: Into<String>,
    {
        self.loader.configure(namespaces);
    }

    pub fn resolve(&self, specifier: &str) -> Result<ResolvedAddress, ResolveError> {
        self.loader.resolve(specifier)
    }

    /// Cached value for a specifier, if it has been loaded
    pub fn cached(&self, specifier: &str) -> Result<Option<ContentValue>, ResolveError> {
        self.loader.cached(specifier)
    }

    pub async fn load_path(&self, specifier: &str, use_cache: bool) -> LoadResult {
        self.loader.load_path(specifier, use_cache).await
    }

    /// Load a specifier, answering from the cache when possible
    pub async fn require(&self, specifier: &str) -> LoadResult {
        self.load_path(specifier, true).await
    }

    /// Load a specifier through its transport even if it is cached
    pub async fn reload(&self, specifier: &str) -> LoadResult {
        self.load_path(specifier, false).await
    }

    /// Load a batch; results are in input order
    pub async fn load(&self, batch: Batch) -> Vec<LoadResult> {
        BatchCoordinator::new(&self.loader).load(batch).await
    }

    /// Callback form of [`Acquire::load_path`].
    ///
    /// `on_result` runs on a spawned task, never before this call returns.
    /// Must be called from within a Tokio runtime.
    pub fn load_path_then<F>(
        &self,
        specifier: impl Into<String>,
        use_cache: bool,
        on_result: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(LoadResult) + Send + 'static,
    {
        let loader = Arc::clone(&self.loader);
        let specifier = specifier.into();
        tokio::spawn(async move {
            let result = loader.load_path(&specifier, use_cache).await;
            on_result(result);
        })
    }

    /// Callback form of [`Acquire::load`].
    ///
    /// Mapping batches are written to the cache before this call returns;
    /// `on_complete` still runs on a spawned task, exactly once.
    pub fn load_then<F>(&self, batch: Batch, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(Vec<LoadResult>) + Send + 'static,
    {
        let loader = Arc::clone(&self.loader);
        match batch {
            Batch::Map(entries) => {
                let results = BatchCoordinator::new(&loader).load_map(entries);
                tokio::spawn(async move {
                    on_complete(results);
                })
            }
            Batch::List(entries) => tokio::spawn(async move {
                let results = BatchCoordinator::new(&loader).load_list(entries).await;
                on_complete(results);
            }),
        }
    }
}
