//! Mock transports shared by the integration tests

#![allow(dead_code)]

use acquire::{ExportedValue, HttpFetcher, ResolvedAddress, ScriptExecutor, TransportError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

/// HTTP fetcher answering from a fixed table.
///
/// Each address has a queue of responses; the last one repeats. Unknown
/// addresses answer 404.
#[derive(Default)]
pub struct MockHttp {
    routes: HashMap<String, Route>,
    calls: Mutex<Vec<String>>,
}

struct Route {
    delay: Duration,
    responses: Mutex<Vec<Result<String, u16>>>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, address: &str, body: &str) -> Self {
        self.respond_after(address, Duration::ZERO, body)
    }

    pub fn respond_after(self, address: &str, delay: Duration, body: &str) -> Self {
        self.route(address, delay, vec![Ok(body.to_string())])
    }

    pub fn fail_after(self, address: &str, delay: Duration, status: u16) -> Self {
        self.route(address, delay, vec![Err(status)])
    }

    /// Respond with each body in turn, repeating the last
    pub fn respond_seq(self, address: &str, delay: Duration, bodies: &[&str]) -> Self {
        let responses = bodies.iter().map(|b| Ok(b.to_string())).collect();
        self.route(address, delay, responses)
    }

    fn route(
        mut self,
        address: &str,
        delay: Duration,
        responses: Vec<Result<String, u16>>,
    ) -> Self {
        self.routes.insert(
            address.to_string(),
            Route {
                delay,
                responses: Mutex::new(responses),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, address: &str) -> usize {
        self.calls.lock().iter().filter(|a| *a == address).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl HttpFetcher for MockHttp {
    async fn fetch(&self, address: &ResolvedAddress) -> Result<String, TransportError> {
        self.calls.lock().push(address.to_string());

        let Some(route) = self.routes.get(address.as_str()) else {
            return Err(TransportError::Status {
                status: 404,
                address: address.to_string(),
            });
        };

        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }

        let response = {
            let mut responses = route.responses.lock();
            if responses.len() > 1 {
                responses.remove(0)
            } else {
                responses[0].clone()
            }
        };

        response.map_err(|status| TransportError::Status {
            status,
            address: address.to_string(),
        })
    }
}

/// HTTP fetcher with no network behind it
pub struct OfflineHttp;

#[async_trait]
impl HttpFetcher for OfflineHttp {
    async fn fetch(&self, address: &ResolvedAddress) -> Result<String, TransportError> {
        Err(TransportError::Unavailable(format!("offline: {address}")))
    }
}

/// What a mock script does when executed
#[derive(Clone)]
pub enum ScriptBehavior {
    Export(ExportedValue),
    NoExport,
    Reject(String),
}

#[derive(Default)]
pub struct MockScripts {
    scripts: HashMap<String, (Duration, ScriptBehavior)>,
    calls: Mutex<Vec<String>>,
}

impl MockScripts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, address: &str, delay: Duration, behavior: ScriptBehavior) -> Self {
        self.scripts.insert(address.to_string(), (delay, behavior));
        self
    }

    pub fn calls_to(&self, address: &str) -> usize {
        self.calls.lock().iter().filter(|a| *a == address).count()
    }
}

#[async_trait]
impl ScriptExecutor for MockScripts {
    async fn execute(
        &self,
        address: &ResolvedAddress,
    ) -> Result<Option<ExportedValue>, TransportError> {
        self.calls.lock().push(address.to_string());

        let (delay, behavior) = self
            .scripts
            .get(address.as_str())
            .cloned()
            .unwrap_or((Duration::ZERO, ScriptBehavior::NoExport));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match behavior {
            ScriptBehavior::Export(value) => Ok(Some(value)),
            ScriptBehavior::NoExport => Ok(None),
            ScriptBehavior::Reject(reason) => Err(TransportError::Rejected(reason)),
        }
    }
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
