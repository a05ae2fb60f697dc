//! Single-address loading
//!
//! [`Loader`] owns the cache, the pending-request queues and the registered
//! transports. A load resolves the specifier, consults the cache, joins or
//! starts the fetch for the address, and dispatches to a transport by
//! extension.
//!
//! A started fetch runs on its own task and settles every waiter when it
//! finishes. Dropping the caller that started it does not cancel it.
//!
//! Results are always delivered after yielding to the scheduler once, so a
//! cache hit completes on a later turn just like a network fetch does.

use crate::address::{ResolvedAddress, ResourceKind};
use crate::cache::ContentCache;
use crate::config::{LoaderConfig, NamespaceConfig};
use crate::content::ContentValue;
use crate::dedup::{BeginFetch, RequestDeduplicator};
use crate::error::{AcquireError, LoadResult, ResolveError, TransportError};
use crate::resolve::PathResolver;
use crate::transport::Transports;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug)]
pub struct Loader {
    config: RwLock<LoaderConfig>,
    cache: Arc<ContentCache>,
    pending: Arc<RequestDeduplicator>,
    transports: Transports,
}

impl Loader {
    pub fn new(config: LoaderConfig, transports: Transports) -> Self {
        Self {
            config: RwLock::new(config),
            cache: Arc::new(ContentCache::new()),
            pending: Arc::new(RequestDeduplicator::new()),
            transports,
        }
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> LoaderConfig {
        self.config.read().clone()
    }

    /// Soft-merge namespace overrides into the configuration
    pub fn configure<I, K>(&self, namespaces: I)
    where
        I: IntoIterator<Item = (K, NamespaceConfig)>,
        K: Into<String>,
    {
        self.config.write().configure(namespaces);
    }

    pub fn resolve(&self, specifier: &str) -> Result<ResolvedAddress, ResolveError> {
        PathResolver::new(&self.config.read()).resolve(specifier)
    }

    pub fn kind_of(&self, address: &ResolvedAddress) -> ResourceKind {
        let config = self.config.read();
        address.kind(&config.script_extension, &config.style_extension)
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub fn pending(&self) -> &RequestDeduplicator {
        &self.pending
    }

    /// Cached value for a specifier, without any transport call
    pub fn cached(&self, specifier: &str) -> Result<Option<ContentValue>, ResolveError> {
        let address = self.resolve(specifier)?;
        Ok(self.cache.get(&address))
    }

    /// Store pre-supplied content under an address
    pub fn preload(&self, address: ResolvedAddress, value: ContentValue) {
        trace!(address = %address, "preloaded");
        self.cache.insert(address, value);
    }

    /// Load one specifier.
    ///
    /// With `use_cache` false the cache lookup is skipped, but the request
    /// still joins a fetch already in flight for the same address.
    pub async fn load_path(self: &Arc<Self>, specifier: &str, use_cache: bool) -> LoadResult {
        let result = match self.resolve(specifier) {
            Ok(address) => self.load_address(&address, use_cache).await,
            Err(e) => Err(e.into()),
        };
        tokio::task::yield_now().await;
        result
    }

    async fn load_address(
        self: &Arc<Self>,
        address: &ResolvedAddress,
        use_cache: bool,
    ) -> LoadResult {
        if use_cache {
            if let Some(value) = self.cache.get(address) {
                trace!(address = %address, "cache hit");
                return Ok(Some(value));
            }
        } else {
            debug!(address = %address, "forced reload");
        }

        match self.pending.begin_fetch(&self.cache, address) {
            BeginFetch::Joined(waiter) => waiter.wait().await,
            BeginFetch::Started { lease, waiter } => {
                let loader = Arc::clone(self);
                tokio::spawn(async move {
                    let result = loader.fetch(lease.address(), use_cache).await;
                    lease.settle(result);
                });
                waiter.wait().await
            }
        }
    }

    async fn fetch(&self, address: &ResolvedAddress, use_cache: bool) -> LoadResult {
        // Another fetch may have settled between the lookup and the lease
        if use_cache {
            if let Some(value) = self.cache.get(address) {
                return Ok(Some(value));
            }
        }
        self.dispatch(address).await
    }

    async fn dispatch(&self, address: &ResolvedAddress) -> LoadResult {
        let kind = self.kind_of(address);
        debug!(address = %address, %kind, "dispatching");

        match kind {
            ResourceKind::Script => {
                let scripts = self
                    .transports
                    .scripts
                    .as_ref()
                    .ok_or_else(|| unavailable(kind, address))?;
                let export = scripts
                    .execute(address)
                    .await
                    .map_err(|e| transport_error(kind, address, e))?;
                Ok(export.map(ContentValue::Exported))
            }
            ResourceKind::Style => {
                let styles = self
                    .transports
                    .styles
                    .as_ref()
                    .ok_or_else(|| unavailable(kind, address))?;
                styles.inject(address).await;
                Ok(Some(ContentValue::Raw(address.to_string())))
            }
            ResourceKind::File => {
                let http = self
                    .transports
                    .http
                    .as_ref()
                    .ok_or_else(|| unavailable(kind, address))?;
                let text = http
                    .fetch(address)
                    .await
                    .map_err(|e| transport_error(kind, address, e))?;
                let value = ContentValue::from_response(text);
                if let ContentValue::Raw(_) = value {
                    trace!(address = %address, "response is not JSON, keeping raw text");
                }
                Ok(Some(value))
            }
        }
    }
}

fn unavailable(kind: ResourceKind, address: &ResolvedAddress) -> AcquireError {
    AcquireError::TransportUnavailable {
        kind,
        address: address.to_string(),
    }
}

fn transport_error(
    kind: ResourceKind,
    address: &ResolvedAddress,
    error: TransportError,
) -> AcquireError {
    match error {
        TransportError::Unavailable(_) => unavailable(kind, address),
        source => AcquireError::Fetch {
            address: address.to_string(),
            source,
        },
    }
}
