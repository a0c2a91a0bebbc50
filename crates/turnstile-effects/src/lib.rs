//! Production effect handlers.
//!
//! Stateless (or embedder-driven) implementations of the `turnstile-core`
//! effect traits that are pure plumbing: the tokio clock, the page signal
//! hub the embedder feeds DOM events into, the in-process viewer-session
//! broadcast bus, URL variable substitution, and tracing-backed
//! instrumentation.
//!
//! Handlers that require host integration (network fetch, the login dialog,
//! identity issuance, DOM application) are implemented by the embedder;
//! simulated versions for tests live in `turnstile-testkit`.

#![forbid(unsafe_code)]

mod broadcast;
mod clock;
mod instrument;
mod page;
mod urls;

pub use broadcast::ProcessBroadcastBus;
pub use clock::TokioClock;
pub use instrument::TracingInstrumentation;
pub use page::PageSignalHub;
pub use urls::SubstitutingExpander;
