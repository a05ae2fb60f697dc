//! Batch loading
//!
//! A [`Batch`] is either an ordered list of specifiers or a set of
//! address/content pairs. Lists are loaded one entry at a time, so results
//! line up with the input no matter how long each transport takes. Mappings
//! are written straight into the cache without any transport call.

use crate::address::ResolvedAddress;
use crate::content::ContentValue;
use crate::error::LoadResult;
use crate::loader::Loader;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Input to a batch load
#[derive(Debug, Clone, PartialEq)]
pub enum Batch {
    /// Specifiers to load in order. Entries that are not strings are skipped
    /// and reported as `Ok(None)` in their position.
    List(Vec<Value>),
    /// Pre-supplied content keyed by address, in iteration order
    Map(Vec<(String, ContentValue)>),
}

impl Batch {
    /// List batch from string specifiers
    pub fn specifiers<I, S>(specifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Batch::List(
            specifiers
                .into_iter()
                .map(|s| Value::String(s.into()))
                .collect(),
        )
    }

    /// Mapping batch from address/content pairs
    pub fn entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ContentValue>,
    {
        Batch::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        match self {
            Batch::List(entries) => entries.len(),
            Batch::Map(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Arrays become lists, objects become mappings, anything else is a
/// one-entry list
impl From<Value> for Batch {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(entries) => Batch::List(entries),
            Value::Object(map) => Batch::Map(
                map.into_iter()
                    .map(|(k, v)| (k, ContentValue::Parsed(v)))
                    .collect(),
            ),
            other => Batch::List(vec![other]),
        }
    }
}

/// Drives a [`Loader`] over a batch
#[derive(Debug, Clone, Copy)]
pub struct BatchCoordinator<'a> {
    loader: &'a Arc<Loader>,
}

impl<'a> BatchCoordinator<'a> {
    pub fn new(loader: &'a Arc<Loader>) -> Self {
        Self { loader }
    }

    /// Load a batch, returning one result per entry in input order
    pub async fn load(&self, batch: Batch) -> Vec<LoadResult> {
        match batch {
            Batch::List(entries) => self.load_list(entries).await,
            Batch::Map(entries) => {
                let results = self.load_map(entries);
                tokio::task::yield_now().await;
                results
            }
        }
    }

    /// Load specifiers strictly one after another
    pub async fn load_list(&self, entries: Vec<Value>) -> Vec<LoadResult> {
        let mut results = Vec::with_capacity(entries.len());
        for (position, entry) in entries.into_iter().enumerate() {
            match entry {
                Value::String(specifier) => {
                    results.push(self.loader.load_path(&specifier, true).await);
                }
                other => {
                    debug!(position, entry = %other, "skipping non-string batch entry");
                    results.push(Ok(None));
                }
            }
        }
        results
    }

    /// Write pre-supplied content into the cache.
    ///
    /// Keys are stored as given, without resolution.
    pub fn load_map(&self, entries: Vec<(String, ContentValue)>) -> Vec<LoadResult> {
        entries
            .into_iter()
            .map(|(key, value)| {
                self.loader
                    .preload(ResolvedAddress::verbatim(key), value.clone());
                Ok(Some(value))
            })
            .collect()
    }
}
