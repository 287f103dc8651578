//! API credential pool
//!
//! The upstream advisory API enforces per-key rate limits, so request load
//! is striped across every configured key. The pool is constructed once,
//! before any fetch, and never mutated. Waypoint tasks share it read-only.

use std::sync::Arc;

/// One upstream API credential: opaque client id/secret pair sent as
/// request headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub client_id: String,
    pub client_secret: String,
}

impl Credential {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

/// An ordered, immutable set of credentials.
///
/// Waypoints are assigned credentials round-robin by ordinal, so a K-key
/// pool sees roughly 1/K of the request load per key.
#[derive(Debug, Clone)]
pub struct CredentialPool {
    credentials: Arc<[Credential]>,
}

impl CredentialPool {
    /// Creates a pool from a non-empty credential list.
    ///
    /// Returns `None` for an empty list. An empty pool can never issue a
    /// request and config validation treats it as fatal.
    pub fn new(credentials: Vec<Credential>) -> Option<Self> {
        if credentials.is_empty() {
            return None;
        }
        Some(Self {
            credentials: credentials.into(),
        })
    }

    /// Number of credentials in the pool.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Returns the credential for the given waypoint ordinal (round-robin).
    pub fn for_ordinal(&self, ordinal: usize) -> &Credential {
        &self.credentials[ordinal % self.credentials.len()]
    }
}
