//! Configuration builders for tests.

use serde_json::{json, Value};

/// Minimal valid `type=client` configuration document.
pub fn client_config() -> Value {
    json!({
        "authorization": "https://pub.example.com/authorize?rid=READER_ID",
        "pingback": "https://pub.example.com/pingback?rid=READER_ID&t=AUTHDATA(child.type)",
        "login": {
            "": "https://pub.example.com/login?rid=READER_ID",
            "subscribe": "https://pub.example.com/subscribe?rid=READER_ID"
        }
    })
}

/// Client configuration with a fallback response attached.
pub fn client_config_with_fallback(fallback: Value) -> Value {
    let mut doc = client_config();
    doc["authorizationFallbackResponse"] = fallback;
    doc
}

/// `type=other` configuration, optionally carrying a fallback response.
pub fn other_config_with_fallback(fallback: Option<Value>) -> Value {
    let mut doc = json!({ "type": "other" });
    if let Some(fallback) = fallback {
        doc["authorizationFallbackResponse"] = fallback;
    }
    doc
}
