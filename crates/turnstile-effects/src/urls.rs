//! URL variable substitution.
//!
//! Production expander for the three variables the engine supplies:
//! `READER_ID`, `RETURN_URL`, and `AUTHDATA(field.path)`. Substituted values
//! are form-encoded so they can sit inside query strings.

use async_trait::async_trait;
use serde_json::Value;
use turnstile_core::authdata;
use turnstile_core::effects::{UrlError, UrlVars, UrlVarsEffects};

/// Token-substituting URL expander.
#[derive(Debug, Clone, Default)]
pub struct SubstitutingExpander;

impl SubstitutingExpander {
    /// Create a new expander.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UrlVarsEffects for SubstitutingExpander {
    async fn expand(&self, url: &str, vars: &UrlVars) -> Result<String, UrlError> {
        let expanded = expand_authdata(url, vars)?;
        let expanded = expanded.replace(
            "READER_ID",
            &encode(vars.reader_id.as_deref().unwrap_or_default()),
        );
        let expanded = expanded.replace(
            "RETURN_URL",
            &encode(vars.return_url.as_deref().unwrap_or_default()),
        );
        Ok(expanded)
    }
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Scalar rendering of an authorization data value for URL substitution.
fn render(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn expand_authdata(url: &str, vars: &UrlVars) -> Result<String, UrlError> {
    const TOKEN: &str = "AUTHDATA(";
    let mut out = String::with_capacity(url.len());
    let mut rest = url;
    while let Some(start) = rest.find(TOKEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + TOKEN.len()..];
        let end = after.find(')').ok_or_else(|| UrlError::Expansion {
            url: url.to_string(),
            reason: "unterminated AUTHDATA(...) variable".to_string(),
        })?;
        let path = &after[..end];
        let value = vars
            .authdata
            .as_deref()
            .and_then(|tree| authdata::field(tree, path));
        out.push_str(&encode(&render(value)));
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn substitutes_reader_id_and_authdata() {
        let expander = SubstitutingExpander::new();
        let vars = UrlVars {
            reader_id: Some("reader-123".to_string()),
            authdata: Some(Arc::new(json!({ "child": { "type": "premium & up" } }))),
            return_url: None,
        };
        let expanded = expander
            .expand(
                "https://pub.example.com/ping?rid=READER_ID&type=AUTHDATA(child.type)",
                &vars,
            )
            .await
            .unwrap();
        assert_eq!(
            expanded,
            "https://pub.example.com/ping?rid=reader-123&type=premium+%26+up"
        );
    }

    #[tokio::test]
    async fn missing_values_become_empty() {
        let expander = SubstitutingExpander::new();
        let expanded = expander
            .expand(
                "https://pub.example.com/a?rid=READER_ID&x=AUTHDATA(absent)",
                &UrlVars::default(),
            )
            .await
            .unwrap();
        assert_eq!(expanded, "https://pub.example.com/a?rid=&x=");
    }

    #[tokio::test]
    async fn unterminated_authdata_is_an_error() {
        let expander = SubstitutingExpander::new();
        let result = expander
            .expand("https://pub.example.com/a?x=AUTHDATA(oops", &UrlVars::default())
            .await;
        assert!(result.is_err());
    }
}
