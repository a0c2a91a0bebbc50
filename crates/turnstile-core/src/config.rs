//! Access configuration model and validation.
//!
//! The host document declares its access configuration as a JSON tree.
//! Parsing happens once, up front, and produces an immutable [`AccessConfig`]
//! or a [`ConfigError`]; nothing downstream ever re-validates. The duck-typed
//! `login` field (a single URL string or a name-to-URL map) is resolved into
//! a [`LoginMap`] at parse time.

use serde_json::Value;
use std::collections::HashMap;

/// Which party decides entitlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// Client-side authorization: the document fetches the entitlement
    /// response and applies it locally.
    Client,
    /// Server-side authorization: the serving infrastructure already applied
    /// the entitlement; the document still fetches for client state.
    Server,
    /// No server contact: visibility driven by the fallback response, if any.
    Other,
}

impl AccessKind {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "client" => Some(Self::Client),
            "server" => Some(Self::Server),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Canonical configuration spelling of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
            Self::Other => "other",
        }
    }

    /// Whether this kind requires authorization, pingback, and login
    /// endpoints to be configured.
    pub fn requires_endpoints(&self) -> bool {
        matches!(self, Self::Client | Self::Server)
    }
}

/// Named login URLs, keyed by variant.
///
/// A configuration that supplies a single URL string is stored under the
/// empty-string variant.
#[derive(Debug, Clone, Default)]
pub struct LoginMap {
    entries: HashMap<String, String>,
}

impl LoginMap {
    /// Variant key used when the configuration supplies a bare URL string.
    pub const DEFAULT_VARIANT: &'static str = "";

    /// Look up the URL configured for a variant.
    pub fn get(&self, variant: &str) -> Option<&str> {
        self.entries.get(variant).map(String::as_str)
    }

    /// True when no login URL is configured at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(variant, url)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Validation failure while building an [`AccessConfig`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// The configuration document was not a JSON object.
    #[error("access configuration must be a JSON object")]
    NotAnObject,
    /// The `type` field named a kind this engine does not know.
    #[error("unknown access type `{value}`")]
    UnknownType {
        /// The rejected type string
        value: String,
    },
    /// A field had the wrong JSON type.
    #[error("`{field}` must be {expected}")]
    WrongFieldType {
        /// Offending field name
        field: &'static str,
        /// Expected shape, e.g. "a string"
        expected: &'static str,
    },
    /// A field mandatory for the configured kind was absent.
    #[error("`{field}` is required for access type `{kind}`")]
    MissingField {
        /// Missing field name
        field: &'static str,
        /// Kind that mandates the field
        kind: &'static str,
    },
    /// A URL failed to parse or used a non-secure scheme.
    #[error("`{field}` must be a secure (https) URL, got `{url}`")]
    InsecureUrl {
        /// Field the URL came from
        field: String,
        /// The rejected URL
        url: String,
    },
    /// The login map parsed but contained no entries.
    #[error("`login` must contain at least one entry for access type `{kind}`")]
    EmptyLoginMap {
        /// Kind that mandates login URLs
        kind: &'static str,
    },
}

/// Immutable, validated access configuration.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    kind: AccessKind,
    authorization_url: Option<String>,
    pingback_url: Option<String>,
    login: LoginMap,
    authorization_fallback_response: Option<Value>,
}

impl AccessConfig {
    /// Parse and validate the host document's access configuration.
    ///
    /// A missing `type` defaults to `client`, matching the behavior of the
    /// host markup this configuration schema comes from.
    pub fn parse(doc: &Value) -> Result<Self, ConfigError> {
        let obj = doc.as_object().ok_or(ConfigError::NotAnObject)?;

        let kind = match obj.get("type") {
            None => AccessKind::Client,
            Some(Value::String(s)) => {
                AccessKind::parse(s).ok_or_else(|| ConfigError::UnknownType { value: s.clone() })?
            }
            Some(_) => {
                return Err(ConfigError::WrongFieldType {
                    field: "type",
                    expected: "a string",
                })
            }
        };

        let authorization_url = parse_url_field(obj.get("authorization"), "authorization")?;
        let pingback_url = parse_url_field(obj.get("pingback"), "pingback")?;
        let login = parse_login(obj.get("login"))?;
        let authorization_fallback_response = obj.get("authorizationFallbackResponse").cloned();

        if kind.requires_endpoints() {
            if authorization_url.is_none() {
                return Err(ConfigError::MissingField {
                    field: "authorization",
                    kind: kind.as_str(),
                });
            }
            if pingback_url.is_none() {
                return Err(ConfigError::MissingField {
                    field: "pingback",
                    kind: kind.as_str(),
                });
            }
            if login.is_empty() {
                return Err(ConfigError::EmptyLoginMap {
                    kind: kind.as_str(),
                });
            }
        }

        Ok(Self {
            kind,
            authorization_url,
            pingback_url,
            login,
            authorization_fallback_response,
        })
    }

    /// The configured access kind.
    pub fn kind(&self) -> AccessKind {
        self.kind
    }

    /// Authorization endpoint URL, if configured.
    pub fn authorization_url(&self) -> Option<&str> {
        self.authorization_url.as_deref()
    }

    /// Pingback endpoint URL, if configured.
    pub fn pingback_url(&self) -> Option<&str> {
        self.pingback_url.as_deref()
    }

    /// Configured login URLs.
    pub fn login(&self) -> &LoginMap {
        &self.login
    }

    /// Locally configured substitute authorization response.
    pub fn authorization_fallback_response(&self) -> Option<&Value> {
        self.authorization_fallback_response.as_ref()
    }
}

fn require_secure(field: &str, raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|_| ConfigError::InsecureUrl {
        field: field.to_string(),
        url: raw.to_string(),
    })?;
    if parsed.scheme() != "https" {
        return Err(ConfigError::InsecureUrl {
            field: field.to_string(),
            url: raw.to_string(),
        });
    }
    Ok(())
}

fn parse_url_field(
    value: Option<&Value>,
    field: &'static str,
) -> Result<Option<String>, ConfigError> {
    match value {
        None => Ok(None),
        Some(Value::String(s)) => {
            require_secure(field, s)?;
            Ok(Some(s.clone()))
        }
        Some(_) => Err(ConfigError::WrongFieldType {
            field,
            expected: "a string",
        }),
    }
}

fn parse_login(value: Option<&Value>) -> Result<LoginMap, ConfigError> {
    let mut entries = HashMap::new();
    match value {
        None => {}
        Some(Value::String(url)) => {
            require_secure("login", url)?;
            entries.insert(LoginMap::DEFAULT_VARIANT.to_string(), url.clone());
        }
        Some(Value::Object(map)) => {
            for (variant, url) in map {
                let url = url.as_str().ok_or(ConfigError::WrongFieldType {
                    field: "login",
                    expected: "a map of strings",
                })?;
                require_secure(&format!("login.{variant}"), url)?;
                entries.insert(variant.clone(), url.to_string());
            }
        }
        Some(_) => {
            return Err(ConfigError::WrongFieldType {
                field: "login",
                expected: "a URL string or a map of strings",
            })
        }
    }
    Ok(LoginMap { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn client_config() -> Value {
        json!({
            "authorization": "https://pub.example.com/authorize?rid=READER_ID",
            "pingback": "https://pub.example.com/pingback?rid=READER_ID",
            "login": "https://pub.example.com/login"
        })
    }

    #[test]
    fn parses_minimal_client_config() {
        let config = AccessConfig::parse(&client_config()).unwrap();
        assert_eq!(config.kind(), AccessKind::Client);
        assert!(config.authorization_url().is_some());
        assert!(config.pingback_url().is_some());
        assert_eq!(
            config.login().get(LoginMap::DEFAULT_VARIANT),
            Some("https://pub.example.com/login")
        );
    }

    #[test]
    fn login_map_variants() {
        let mut doc = client_config();
        doc["login"] = json!({
            "signin": "https://pub.example.com/signin",
            "subscribe": "https://pub.example.com/subscribe"
        });
        let config = AccessConfig::parse(&doc).unwrap();
        assert_eq!(
            config.login().get("subscribe"),
            Some("https://pub.example.com/subscribe")
        );
        assert_eq!(config.login().get("signin-other"), None);
    }

    #[test]
    fn rejects_unknown_type() {
        let mut doc = client_config();
        doc["type"] = json!("vendor");
        assert_matches!(
            AccessConfig::parse(&doc),
            Err(ConfigError::UnknownType { value }) if value == "vendor"
        );
    }

    #[test]
    fn rejects_missing_mandatory_fields() {
        for field in ["authorization", "pingback", "login"] {
            let mut doc = client_config();
            doc.as_object_mut().unwrap().remove(field);
            let err = AccessConfig::parse(&doc).unwrap_err();
            match err {
                ConfigError::MissingField { field: f, .. } => assert_eq!(f, field),
                ConfigError::EmptyLoginMap { .. } => assert_eq!(field, "login"),
                other => panic!("unexpected error for {field}: {other}"),
            }
        }
    }

    #[test]
    fn server_type_has_same_mandatory_fields() {
        let doc = json!({ "type": "server" });
        assert_matches!(
            AccessConfig::parse(&doc),
            Err(ConfigError::MissingField { field: "authorization", .. })
        );
    }

    #[test]
    fn rejects_insecure_urls() {
        let mut doc = client_config();
        doc["authorization"] = json!("http://pub.example.com/authorize");
        assert_matches!(
            AccessConfig::parse(&doc),
            Err(ConfigError::InsecureUrl { field, .. }) if field == "authorization"
        );
    }

    #[test]
    fn type_other_needs_no_endpoints() {
        let doc = json!({
            "type": "other",
            "authorizationFallbackResponse": { "subscriber": false }
        });
        let config = AccessConfig::parse(&doc).unwrap();
        assert_eq!(config.kind(), AccessKind::Other);
        assert!(config.login().is_empty());
        assert!(config.authorization_fallback_response().is_some());
    }

    #[test]
    fn rejects_non_object_document() {
        assert_matches!(
            AccessConfig::parse(&json!("not a config")),
            Err(ConfigError::NotAnObject)
        );
    }
}
