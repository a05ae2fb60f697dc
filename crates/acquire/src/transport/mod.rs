//! Transport collaborators
//!
//! The loader never performs I/O or code execution itself. It calls into three
//! capabilities supplied by the host:
//!
//! - [`ScriptExecutor`] runs a script and reports what it exported
//! - [`StyleInjector`] attaches a stylesheet
//! - [`HttpFetcher`] retrieves text
//!
//! A capability that is not registered makes loads of that kind fail with
//! `TransportUnavailable`.

mod http;
mod prefetch;
mod stylesheets;

pub use http::{ReqwestFetcher, MAX_CONTENT_SIZE, REQUEST_TIMEOUT};
pub use prefetch::PrefetchScriptExecutor;
pub use stylesheets::StyleSheetList;

use crate::address::ResolvedAddress;
use crate::content::ExportedValue;
use crate::error::TransportError;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    /// Execute the script at `address`.
    ///
    /// Returns the value the script registered as its export, if any. Side
    /// effects of running the same script twice are the executor's concern.
    async fn execute(
        &self,
        address: &ResolvedAddress,
    ) -> Result<Option<ExportedValue>, TransportError>;
}

#[async_trait]
pub trait StyleInjector: Send + Sync {
    /// Attach the stylesheet at `address`. Resolves once injection is complete.
    async fn inject(&self, address: &ResolvedAddress);
}

#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Retrieve the text at `address`.
    ///
    /// Implementations classify statuses with [`classify_status`].
    async fn fetch(&self, address: &ResolvedAddress) -> Result<String, TransportError>;
}

/// How an HTTP status affects a pending fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 200: the body is the content
    Success,
    /// 404..=599: terminal failure
    Failure,
    /// Anything else: not terminal, keep waiting
    Pending,
}

pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200 => StatusClass::Success,
        404..=599 => StatusClass::Failure,
        _ => StatusClass::Pending,
    }
}

/// Registered collaborators
#[derive(Clone, Default)]
pub struct Transports {
    pub scripts: Option<Arc<dyn ScriptExecutor>>,
    pub styles: Option<Arc<dyn StyleInjector>>,
    pub http: Option<Arc<dyn HttpFetcher>>,
}

impl Transports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scripts(mut self, scripts: Arc<dyn ScriptExecutor>) -> Self {
        self.scripts = Some(scripts);
        self
    }

    pub fn with_styles(mut self, styles: Arc<dyn StyleInjector>) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn with_http(mut self, http: Arc<dyn HttpFetcher>) -> Self {
        self.http = Some(http);
        self
    }
}

impl std::fmt::Debug for Transports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transports")
            .field("scripts", &self.scripts.is_some())
            .field("styles", &self.styles.is_some())
            .field("http", &self.http.is_some())
            .finish()
    }
}
