//! Request deduplication
//!
//! At most one fetch per address is in flight at any time. Every caller,
//! including the one that starts the fetch, is queued as a [`Waiter`]. The
//! starting caller also receives a [`FetchLease`], which it hands to the task
//! that drives the transport. The lease is owned, so the fetch outlives any
//! individual caller.
//!
//! Settlement writes the cache on success, drains the queue in arrival order
//! and removes the pending entry.

use crate::address::ResolvedAddress;
use crate::cache::ContentCache;
use crate::error::{AcquireError, LoadResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Per-address queue of pending waiters
#[derive(Debug, Default)]
pub struct RequestDeduplicator {
    pending: Mutex<HashMap<ResolvedAddress, Vec<oneshot::Sender<LoadResult>>>>,
}

/// Result of registering interest in an address
#[derive(Debug)]
pub enum BeginFetch {
    /// No fetch was pending. Whoever holds the lease must drive the fetch and
    /// settle it; the waiter receives the outcome like any other.
    Started { lease: FetchLease, waiter: Waiter },
    /// A fetch is already in flight; await its outcome
    Joined(Waiter),
}

impl BeginFetch {
    pub fn already_pending(&self) -> bool {
        matches!(self, BeginFetch::Joined(_))
    }
}

impl RequestDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a waiter for `address`, starting a fetch if none is in flight
    pub fn begin_fetch(
        self: &Arc<Self>,
        cache: &Arc<ContentCache>,
        address: &ResolvedAddress,
    ) -> BeginFetch {
        let (tx, rx) = oneshot::channel();
        let waiter = Waiter {
            address: address.clone(),
            rx,
        };

        let mut pending = self.pending.lock();
        match pending.get_mut(address) {
            Some(queue) => {
                queue.push(tx);
                debug!(address = %address, waiters = queue.len(), "joined pending fetch");
                BeginFetch::Joined(waiter)
            }
            None => {
                pending.insert(address.clone(), vec![tx]);
                debug!(address = %address, "fetch started");
                BeginFetch::Started {
                    lease: FetchLease {
                        dedup: Arc::clone(self),
                        cache: Arc::clone(cache),
                        address: address.clone(),
                        settled: false,
                    },
                    waiter,
                }
            }
        }
    }

    /// Whether a fetch is in flight for `address`
    pub fn is_pending(&self, address: &ResolvedAddress) -> bool {
        self.pending.lock().contains_key(address)
    }

    /// Number of callers waiting on the in-flight fetch for `address`
    pub fn waiter_count(&self, address: &ResolvedAddress) -> Option<usize> {
        self.pending.lock().get(address).map(Vec::len)
    }

    /// Number of addresses with a fetch in flight
    pub fn in_flight(&self) -> usize {
        self.pending.lock().len()
    }

    /// Write the cache on success, then drain and drop the queue for `address`.
    ///
    /// Returns the number of waiters notified.
    fn settle(
        &self,
        cache: &ContentCache,
        address: &ResolvedAddress,
        result: &LoadResult,
    ) -> usize {
        if let Ok(Some(value)) = result {
            cache.insert(address.clone(), value.clone());
        }

        let waiters = self.pending.lock().remove(address).unwrap_or_default();
        let count = waiters.len();
        for waiter in waiters {
            // A waiter whose caller went away has nothing left to notify
            let _ = waiter.send(result.clone());
        }
        count
    }
}

/// Exclusive right to drive the fetch for one address.
///
/// Dropping an unsettled lease (the driving task panicked, or the runtime
/// shut down under it) settles it with [`AcquireError::Abandoned`] so queued
/// waiters are never stranded.
#[derive(Debug)]
pub struct FetchLease {
    dedup: Arc<RequestDeduplicator>,
    cache: Arc<ContentCache>,
    address: ResolvedAddress,
    settled: bool,
}

impl FetchLease {
    pub fn address(&self) -> &ResolvedAddress {
        &self.address
    }

    /// Settle the fetch, fanning `result` out to every queued waiter
    pub fn settle(mut self, result: LoadResult) {
        self.settled = true;
        let waiters = self.dedup.settle(&self.cache, &self.address, &result);
        debug!(
            address = %self.address,
            waiters,
            ok = result.is_ok(),
            "fetch settled"
        );
    }
}

impl Drop for FetchLease {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let result = Err(AcquireError::Abandoned {
            address: self.address.to_string(),
        });
        let waiters = self.dedup.settle(&self.cache, &self.address, &result);
        warn!(address = %self.address, waiters, "fetch abandoned before settling");
    }
}

/// Pending interest in a fetch
#[derive(Debug)]
pub struct Waiter {
    address: ResolvedAddress,
    rx: oneshot::Receiver<LoadResult>,
}

impl Waiter {
    pub fn address(&self) -> &ResolvedAddress {
        &self.address
    }

    /// Wait for the fetch to settle
    pub async fn wait(self) -> LoadResult {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(AcquireError::Abandoned {
                address: self.address.into_string(),
            }),
        }
    }
}
