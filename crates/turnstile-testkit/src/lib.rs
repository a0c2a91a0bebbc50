//! Simulated effect handlers for Turnstile tests.
//!
//! Scripted counterparts of the handlers a real embedder supplies: a
//! programmable fetcher and login dialog, a region-based applier that
//! actually evaluates visibility expressions, a fixed identity source, and
//! a recording instrumentation sink. Everything mutates through plain
//! methods so tests can steer behavior mid-scenario.

#![forbid(unsafe_code)]
#![allow(clippy::unwrap_used)]

mod apply;
mod config;
mod dialog;
mod fetch;
mod identity;
mod instrument;

pub use apply::RegionApplier;
pub use config::{client_config, client_config_with_fallback, other_config_with_fallback};
pub use dialog::ScriptedDialog;
pub use fetch::ScriptedFetch;
pub use identity::FixedIdentity;
pub use instrument::RecordingInstrumentation;

/// Install a tracing subscriber for test debugging, filtered by
/// `RUST_LOG`. Safe to call from every test; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
