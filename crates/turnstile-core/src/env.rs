//! Per-document environment.
//!
//! One engine instance serves one document. The environment records the
//! publisher origin the document was served under, whether it is served from
//! a restricted proxy origin, and an instance identifier used to tell a
//! document's own broadcasts apart from its peers'.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for one document instance within a viewer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Allocate a fresh document identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Environment of the document an engine instance is attached to.
#[derive(Debug, Clone)]
pub struct DocumentEnv {
    /// Publisher origin, used to scope reauthorize broadcasts.
    pub origin: String,
    /// Whether the document is served from a restricted proxy origin.
    pub proxied: bool,
    /// This document's instance identifier.
    pub document_id: DocumentId,
}

impl DocumentEnv {
    /// Environment for a document served directly from the publisher origin.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            proxied: false,
            document_id: DocumentId::new(),
        }
    }

    /// Mark the document as served from a restricted proxy origin.
    pub fn proxied(mut self, proxied: bool) -> Self {
        self.proxied = proxied;
        self
    }
}
