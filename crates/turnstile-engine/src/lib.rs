//! Turnstile orchestration engine
//!
//! Gates visibility of content regions behind a server-determined
//! entitlement and reports confirmed views back to the server. The engine
//! fetches authorization exactly once per trigger, guarantees that the very
//! first authorization settles no later than any subsequent one, detects
//! qualifying views without false positives, deduplicates concurrent login
//! attempts, and propagates re-authorization across documents sharing a
//! viewer session.
//!
//! All I/O happens through the effect traits defined in `turnstile-core`;
//! see [`service::AccessHandlers`] for the full set a document must supply.
//!
//! # Lifetime
//!
//! One [`service::AccessService`] serves one document for the document's
//! whole lifetime. There is no teardown: background work (the view cycle,
//! the reauthorize listener, in-flight login attempts) ends with the
//! runtime.

#![forbid(unsafe_code)]

pub mod authorization;
pub mod broadcast;
pub mod identity;
pub mod login;
pub mod pingback;
pub mod service;
pub mod view;

pub use authorization::{AuthorizationEngine, AuthorizationOutcome, AUTHORIZATION_TIMEOUT_MS};
pub use broadcast::ReauthorizeBroadcaster;
pub use identity::ReaderIdentity;
pub use login::{LoginCoordinator, LoginOutcome, LOGIN_DEDUP_WINDOW_MS};
pub use pingback::PingbackReporter;
pub use service::{AccessHandlers, AccessService};
pub use view::{ViewDetector, ViewOutcome, ViewScheduler, DEFAULT_TIME_TO_VIEW_MS};
