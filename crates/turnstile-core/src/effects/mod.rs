//! Effect trait definitions.
//!
//! Every suspending collaborator of the engine (network fetches, timers,
//! page signals, the login dialog, identity resolution, URL variable
//! expansion, DOM application, instrumentation, and the viewer-session
//! broadcast channel) sits behind one of these traits. The engine never
//! performs I/O directly; production handlers live in `turnstile-effects`
//! and simulated handlers in `turnstile-testkit`.
//!
//! Each effect carries its own narrow error enum beside its trait so
//! handlers do not need the engine's unified error type.

mod apply;
mod broadcast;
mod clock;
mod dialog;
mod fetch;
mod identity;
mod instrument;
mod page;
mod urls;

pub use apply::{ApplyEffects, ApplyError};
pub use broadcast::{
    BroadcastEffects, BroadcastEnvelope, BroadcastError, ReauthorizeMessage,
    REAUTHORIZE_MESSAGE_TYPE,
};
pub use clock::ClockEffects;
pub use dialog::{DialogEffects, DialogError};
pub use fetch::{FetchEffects, FetchError};
pub use identity::{IdentityEffects, IdentityError};
pub use instrument::{AccessEvent, InstrumentationEffects};
pub use page::PageEffects;
pub use urls::{UrlError, UrlVars, UrlVarsEffects};
