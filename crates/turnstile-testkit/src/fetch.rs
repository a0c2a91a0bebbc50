//! Scripted network fetch handler.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::time::Duration;
use turnstile_core::effects::{FetchEffects, FetchError};

struct Inner {
    authorization: Result<Value, FetchError>,
    authorization_delay_ms: u64,
    pingback: Result<(), FetchError>,
    authorization_calls: Vec<String>,
    pingback_calls: Vec<String>,
}

/// Programmable fetch handler.
///
/// Defaults to returning `{}` for authorization and success for pingback;
/// tests script responses, failures, and delays as the scenario needs.
pub struct ScriptedFetch {
    inner: Mutex<Inner>,
}

impl ScriptedFetch {
    /// Handler answering every authorization fetch with `{}`.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                authorization: Ok(Value::Object(Default::default())),
                authorization_delay_ms: 0,
                pingback: Ok(()),
                authorization_calls: Vec::new(),
                pingback_calls: Vec::new(),
            }),
        }
    }

    /// Script the standing authorization response.
    pub fn respond_with(&self, response: Value) {
        self.inner.lock().authorization = Ok(response);
    }

    /// Script authorization fetches to fail at the transport level.
    pub fn fail_authorization(&self) {
        self.inner.lock().authorization = Err(FetchError::Transport {
            url: "scripted".to_string(),
            reason: "scripted transport failure".to_string(),
        });
    }

    /// Delay every authorization fetch by `ms` of (virtual) time.
    pub fn set_authorization_delay_ms(&self, ms: u64) {
        self.inner.lock().authorization_delay_ms = ms;
    }

    /// Script pingback sends to fail.
    pub fn fail_pingback(&self) {
        self.inner.lock().pingback = Err(FetchError::Rejected {
            url: "scripted".to_string(),
            status: 500,
        });
    }

    /// URLs of every authorization fetch so far.
    pub fn authorization_calls(&self) -> Vec<String> {
        self.inner.lock().authorization_calls.clone()
    }

    /// URLs of every pingback send so far.
    pub fn pingback_calls(&self) -> Vec<String> {
        self.inner.lock().pingback_calls.clone()
    }
}

impl Default for ScriptedFetch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FetchEffects for ScriptedFetch {
    async fn fetch_authorization(&self, url: &str) -> Result<Value, FetchError> {
        let (delay, result) = {
            let mut inner = self.inner.lock();
            inner.authorization_calls.push(url.to_string());
            (inner.authorization_delay_ms, inner.authorization.clone())
        };
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        result
    }

    async fn send_pingback(&self, url: &str) -> Result<(), FetchError> {
        let mut inner = self.inner.lock();
        inner.pingback_calls.push(url.to_string());
        inner.pingback.clone()
    }
}
