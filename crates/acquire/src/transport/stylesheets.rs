use super::StyleInjector;
use crate::address::ResolvedAddress;
use async_trait::async_trait;
use parking_lot::Mutex;

/// Style injector that records stylesheets in injection order
#[derive(Debug, Default)]
pub struct StyleSheetList {
    sheets: Mutex<Vec<ResolvedAddress>>,
}

impl StyleSheetList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Injected stylesheets, oldest first
    pub fn sheets(&self) -> Vec<ResolvedAddress> {
        self.sheets.lock().clone()
    }
}

#[async_trait]
impl StyleInjector for StyleSheetList {
    async fn inject(&self, address: &ResolvedAddress) {
        self.sheets.lock().push(address.clone());
    }
}
