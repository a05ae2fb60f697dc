//! Resolved addresses
//!
//! A [`ResolvedAddress`] is the normalized key every cache and pending-request
//! lookup goes through. Two specifiers that resolve to the same string are the
//! same resource.

use std::fmt;

/// Transport family selected from an address's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Executable script, handled by the script executor
    Script,
    /// Stylesheet, handled by the style injector
    Style,
    /// Anything else, fetched as text over HTTP
    File,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Script => write!(f, "script"),
            ResourceKind::Style => write!(f, "style"),
            ResourceKind::File => write!(f, "file"),
        }
    }
}

/// Normalized absolute resource location
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolvedAddress(String);

impl ResolvedAddress {
    /// Wrap a string that is already in resolved form.
    ///
    /// No normalization happens here; use [`crate::PathResolver`] for raw
    /// specifiers.
    pub fn verbatim(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Path portion of the address, without query string or fragment
    pub fn path(&self) -> &str {
        split_suffix(&self.0).0
    }

    /// Extension of the final path component, if any
    pub fn extension(&self) -> Option<&str> {
        file_extension(self.path())
    }

    /// Classify the address by extension
    pub fn kind(&self, script_extension: &str, style_extension: &str) -> ResourceKind {
        match self.extension() {
            Some(ext) if ext == script_extension => ResourceKind::Script,
            Some(ext) if ext == style_extension => ResourceKind::Style,
            _ => ResourceKind::File,
        }
    }
}

impl fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResolvedAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split an address into its path and its `?query#fragment` tail
pub(crate) fn split_suffix(address: &str) -> (&str, &str) {
    match address.find(['?', '#']) {
        Some(idx) => address.split_at(idx),
        None => (address, ""),
    }
}

/// Extension of the last `/`-separated component of `path`
pub(crate) fn file_extension(path: &str) -> Option<&str> {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}
