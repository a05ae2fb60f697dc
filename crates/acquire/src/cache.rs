//! Content cache
//!
//! Process-lifetime map from resolved address to loaded content. Entries are
//! created on the first successful load, overwritten by forced reloads and
//! mapping preloads, and never evicted.

use crate::address::ResolvedAddress;
use crate::content::ContentValue;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct ContentCache {
    entries: DashMap<ResolvedAddress, ContentValue>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an address
    pub fn get(&self, address: &ResolvedAddress) -> Option<ContentValue> {
        self.entries.get(address).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, address: &ResolvedAddress) -> bool {
        self.entries.contains_key(address)
    }

    /// Store content, returning the value it replaced
    pub(crate) fn insert(
        &self,
        address: ResolvedAddress,
        value: ContentValue,
    ) -> Option<ContentValue> {
        self.entries.insert(address, value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached addresses in sorted order
    pub fn addresses(&self) -> Vec<ResolvedAddress> {
        let mut addresses: Vec<_> = self.entries.iter().map(|e| e.key().clone()).collect();
        addresses.sort();
        addresses
    }
}
