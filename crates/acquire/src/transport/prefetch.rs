use super::{HttpFetcher, ScriptExecutor};
use crate::address::ResolvedAddress;
use crate::content::ExportedValue;
use crate::error::TransportError;
use async_trait::async_trait;
use std::sync::Arc;

/// Script executor for hosts without a script engine.
///
/// Downloads the script to confirm it is reachable and reports no export.
pub struct PrefetchScriptExecutor {
    http: Arc<dyn HttpFetcher>,
}

impl PrefetchScriptExecutor {
    pub fn new(http: Arc<dyn HttpFetcher>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ScriptExecutor for PrefetchScriptExecutor {
    async fn execute(
        &self,
        address: &ResolvedAddress,
    ) -> Result<Option<ExportedValue>, TransportError> {
        self.http.fetch(address).await?;
        Ok(None)
    }
}
