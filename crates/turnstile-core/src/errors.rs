//! Unified error type for the access engine.
//!
//! Each effect trait carries its own narrow error enum next to its
//! definition; this module provides the single cloneable error the engine
//! surfaces to callers, mirroring the taxonomy of the system: configuration,
//! authorization, pingback, login, cancellation.

use serde::{Deserialize, Serialize};

/// Unified error type for access engine operations.
///
/// Cloneable so shared futures (first/last authorization, deduplicated login
/// attempts) can hand the same settled result to every waiter.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum AccessError {
    /// Malformed or incomplete access configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong with the configuration
        message: String,
    },

    /// Authorization fetch or application failed.
    #[error("Authorization error: {message}")]
    Authorization {
        /// Why the authorization run failed
        message: String,
    },

    /// View report could not be delivered.
    #[error("Pingback error: {message}")]
    Pingback {
        /// Why the pingback failed
        message: String,
    },

    /// Interactive login attempt failed.
    #[error("Login error: {message}")]
    Login {
        /// Why the login attempt failed
        message: String,
    },

    /// An in-flight wait was canceled rather than failed.
    #[error("Canceled: {message}")]
    Canceled {
        /// What canceled the wait
        message: String,
    },

    /// The document carries no access configuration.
    #[error("access is not configured for this document")]
    NotConfigured,

    /// Violated internal invariant.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the violated invariant
        message: String,
    },
}

impl AccessError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an authorization error
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Create a pingback error
    pub fn pingback(message: impl Into<String>) -> Self {
        Self::Pingback {
            message: message.into(),
        }
    }

    /// Create a login error
    pub fn login(message: impl Into<String>) -> Self {
        Self::Login {
            message: message.into(),
        }
    }

    /// Create a cancellation signal
    pub fn canceled(message: impl Into<String>) -> Self {
        Self::Canceled {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error is a cancellation signal rather than a failure.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled { .. })
    }
}

impl From<crate::config::ConfigError> for AccessError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}

impl From<crate::expr::ExprError> for AccessError {
    fn from(err: crate::expr::ExprError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<crate::effects::FetchError> for AccessError {
    fn from(err: crate::effects::FetchError) -> Self {
        Self::authorization(err.to_string())
    }
}

impl From<crate::effects::IdentityError> for AccessError {
    fn from(err: crate::effects::IdentityError) -> Self {
        Self::authorization(err.to_string())
    }
}

impl From<crate::effects::UrlError> for AccessError {
    fn from(err: crate::effects::UrlError) -> Self {
        Self::authorization(err.to_string())
    }
}

impl From<crate::effects::DialogError> for AccessError {
    fn from(err: crate::effects::DialogError) -> Self {
        Self::login(err.to_string())
    }
}

impl From<crate::effects::ApplyError> for AccessError {
    fn from(err: crate::effects::ApplyError) -> Self {
        Self::authorization(err.to_string())
    }
}

impl From<crate::effects::BroadcastError> for AccessError {
    fn from(err: crate::effects::BroadcastError) -> Self {
        Self::internal(err.to_string())
    }
}

/// Standard Result type for access engine operations
pub type Result<T> = std::result::Result<T, AccessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = AccessError::authorization("request timed out");
        assert!(matches!(err, AccessError::Authorization { .. }));
        assert_eq!(err.to_string(), "Authorization error: request timed out");
    }

    #[test]
    fn test_canceled_is_distinguishable() {
        assert!(AccessError::canceled("document hidden").is_canceled());
        assert!(!AccessError::login("dialog dismissed").is_canceled());
    }
}
