//! HTTP fetcher over reqwest

use super::{classify_status, HttpFetcher, StatusClass};
use crate::address::ResolvedAddress;
use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::trace;
use url::Url;

/// Maximum response size (50 MB)
pub const MAX_CONTENT_SIZE: u64 = 50 * 1024 * 1024;

/// HTTP client configuration
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches addresses over HTTP, joining relative addresses onto a base URL
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
    base: Option<Url>,
    max_size: u64,
}

impl ReqwestFetcher {
    /// Create a fetcher. Without a base URL only absolute addresses can be fetched.
    pub fn new(base: Option<Url>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("acquire/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base,
            max_size: MAX_CONTENT_SIZE,
        })
    }

    /// Limit the accepted response size
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// URL an address is fetched from
    pub fn url_for(&self, address: &ResolvedAddress) -> Result<Url, TransportError> {
        let address = address.as_str();
        if address.contains("://") {
            return Url::parse(address)
                .map_err(|e| TransportError::Request(format!("{}: {}", address, e)));
        }

        match &self.base {
            Some(base) => base
                .join(address)
                .map_err(|e| TransportError::Request(format!("{}: {}", address, e))),
            None => Err(TransportError::Unavailable(format!(
                "no base URL to fetch {}",
                address
            ))),
        }
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch(&self, address: &ResolvedAddress) -> Result<String, TransportError> {
        let url = self.url_for(address)?;
        trace!(%url, "GET");

        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        match classify_status(status) {
            StatusClass::Success => {}
            StatusClass::Failure => {
                return Err(TransportError::Status {
                    status,
                    address: address.to_string(),
                })
            }
            // reqwest only hands back final responses, so nothing else is coming
            StatusClass::Pending => {
                return Err(TransportError::UnexpectedStatus {
                    status,
                    address: address.to_string(),
                })
            }
        }

        if let Some(len) = response.content_length() {
            if len > self.max_size {
                return Err(TransportError::Request(format!(
                    "content too large: {} bytes (max: {})",
                    len, self.max_size
                )));
            }
        }

        let body = response.bytes().await?;
        if body.len() as u64 > self.max_size {
            return Err(TransportError::Request(format!(
                "content too large: {} bytes (max: {})",
                body.len(),
                self.max_size
            )));
        }

        String::from_utf8(body.to_vec())
            .map_err(|e| TransportError::Request(format!("{}: {}", address, e)))
    }
}
