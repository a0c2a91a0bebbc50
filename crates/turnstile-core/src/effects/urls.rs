//! URL variable expansion effects.
//!
//! Outbound URLs (authorization, pingback, login) may carry variables that
//! are substituted right before use: `READER_ID`, `RETURN_URL`, and
//! `AUTHDATA(field.path)` over the current authorization response.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Variable values available to one expansion.
#[derive(Debug, Clone, Default)]
pub struct UrlVars {
    /// Resolved reader identifier, substituted for `READER_ID`.
    pub reader_id: Option<String>,
    /// Current authorization response, backing `AUTHDATA(...)`.
    pub authdata: Option<Arc<Value>>,
    /// Return URL for login round-trips, substituted for `RETURN_URL`.
    pub return_url: Option<String>,
}

/// URL expansion failure.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum UrlError {
    /// The URL template could not be expanded.
    #[error("failed to expand `{url}`: {reason}")]
    Expansion {
        /// The URL template
        url: String,
        /// What went wrong
        reason: String,
    },
}

/// URL variable expansion collaborator.
#[async_trait]
pub trait UrlVarsEffects: Send + Sync {
    /// Expand the variables in `url` using the supplied values.
    async fn expand(&self, url: &str, vars: &UrlVars) -> Result<String, UrlError>;
}
