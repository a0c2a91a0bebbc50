//! Scripted login dialog handler.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;
use turnstile_core::effects::{DialogEffects, DialogError};

struct Inner {
    payload: Result<String, DialogError>,
    delay_ms: u64,
    opens: Vec<String>,
}

/// Programmable login dialog.
///
/// Defaults to reporting `success=true` immediately. The delay stands in for
/// the time the reader spends in the dialog.
pub struct ScriptedDialog {
    inner: Mutex<Inner>,
}

impl ScriptedDialog {
    /// Dialog that reports `success=true`.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                payload: Ok("success=true".to_string()),
                delay_ms: 0,
                opens: Vec::new(),
            }),
        }
    }

    /// Script the dialog's return payload.
    pub fn return_payload(&self, payload: impl Into<String>) {
        self.inner.lock().payload = Ok(payload.into());
    }

    /// Script the dialog to fail to open.
    pub fn fail(&self) {
        self.inner.lock().payload = Err(DialogError::Launch {
            reason: "scripted dialog failure".to_string(),
        });
    }

    /// Keep the dialog open for `ms` of (virtual) time before it settles.
    pub fn set_delay_ms(&self, ms: u64) {
        self.inner.lock().delay_ms = ms;
    }

    /// URLs the dialog was opened with, in order.
    pub fn opens(&self) -> Vec<String> {
        self.inner.lock().opens.clone()
    }

    /// How many dialogs were actually opened.
    pub fn open_count(&self) -> usize {
        self.inner.lock().opens.len()
    }
}

impl Default for ScriptedDialog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DialogEffects for ScriptedDialog {
    async fn open_login_dialog(&self, url: &str) -> Result<String, DialogError> {
        let (delay, result) = {
            let mut inner = self.inner.lock();
            inner.opens.push(url.to_string());
            (inner.delay_ms, inner.payload.clone())
        };
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        result
    }
}
