//! Error taxonomy
//!
//! Errors that reach waiters are fanned out to every caller queued on the same
//! address, so they are `Clone`.

use crate::address::ResourceKind;
use thiserror::Error;

/// Malformed specifier. Raised before any transport call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Empty specifier
    #[error("Empty specifier")]
    Empty,

    /// Specifier contains whitespace or control characters
    #[error("Specifier contains whitespace or control characters: {0:?}")]
    Whitespace(String),

    /// Absolute address with no file component (ends in `/`)
    #[error("Address has no file name: {0}")]
    MissingFileName(String),

    /// Namespaced specifier with an empty path segment (`a//b`)
    #[error("Empty path segment in specifier: {0}")]
    EmptySegment(String),
}

/// Failure reported by a transport collaborator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The host has no usable mechanism for this kind of resource
    #[error("Transport unavailable: {0}")]
    Unavailable(String),

    /// Terminal unsuccessful HTTP status (404..=599)
    #[error("HTTP {status} for address: {address}")]
    Status { status: u16, address: String },

    /// Final status outside both the success and failure ranges
    #[error("Unexpected HTTP {status} for address: {address}")]
    UnexpectedStatus { status: u16, address: String },

    /// Request could not be completed
    #[error("Request failed: {0}")]
    Request(String),

    /// Script execution was rejected
    #[error("Script rejected: {0}")]
    Rejected(String),
}

impl TransportError {
    /// Gets the HTTP status code if this is a status error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. }
            | TransportError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error.to_string())
    }
}

/// Errors surfaced to callers of the loader
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AcquireError {
    /// Specifier could not be resolved
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// No collaborator is registered for the address's kind
    #[error("No {kind} transport available for {address}")]
    TransportUnavailable { kind: ResourceKind, address: String },

    /// Transport reported a terminal failure
    #[error("Failed to load {address}: {source}")]
    Fetch {
        address: String,
        #[source]
        source: TransportError,
    },

    /// The request leading this fetch was dropped before it settled
    #[error("Load of {address} was abandoned before it settled")]
    Abandoned { address: String },
}

impl AcquireError {
    /// Address the error concerns, when one was resolved
    pub fn address(&self) -> Option<&str> {
        match self {
            AcquireError::Resolve(_) => None,
            AcquireError::TransportUnavailable { address, .. }
            | AcquireError::Fetch { address, .. }
            | AcquireError::Abandoned { address } => Some(address),
        }
    }
}

/// Outcome of loading one address.
///
/// `Ok(None)` is a successful load that produced nothing to cache, such as a
/// script that registered no export.
pub type LoadResult = Result<Option<crate::content::ContentValue>, AcquireError>;
