//! Network fetch effects.
//!
//! The authorization fetch and the pingback send are the only two network
//! operations the engine performs. Credentials handling, CORS mode, and the
//! actual transport are the handler's concern; the engine supplies fully
//! expanded URLs and bounds the authorization fetch with its own timeout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Network operation failure.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum FetchError {
    /// The request never completed.
    #[error("request to {url} failed: {reason}")]
    Transport {
        /// Target URL
        url: String,
        /// Transport-level reason
        reason: String,
    },
    /// The endpoint answered with a non-success status.
    #[error("request to {url} was rejected with status {status}")]
    Rejected {
        /// Target URL
        url: String,
        /// HTTP status code
        status: u16,
    },
    /// The response body was not a JSON document.
    #[error("response from {url} was not valid JSON: {reason}")]
    Malformed {
        /// Target URL
        url: String,
        /// Parse failure detail
        reason: String,
    },
}

/// Network operations used by the engine.
#[async_trait]
pub trait FetchEffects: Send + Sync {
    /// Fetch the authorization response document from an expanded URL.
    async fn fetch_authorization(&self, url: &str) -> Result<Value, FetchError>;

    /// Deliver a view report to an expanded pingback URL.
    ///
    /// POST with an empty body; the response body is ignored.
    async fn send_pingback(&self, url: &str) -> Result<(), FetchError>;
}
