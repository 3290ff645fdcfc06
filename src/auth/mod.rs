//! Authentication seam for the data layer.
//!
//! The transport never owns credentials. It consumes a `CredentialProvider`
//! for header injection and for the mandatory clear-session side effect on
//! HTTP 401. `Session`/`SharedSession` is the in-process implementation;
//! durable storage and login flows live outside this crate.

pub mod session;

pub use session::{Session, SessionData, SharedSession};

/// Source of the current bearer credential.
///
/// `clear_session` is the global auth-failure policy: the transport calls
/// it unconditionally on a 401 response, before the error propagates.
pub trait CredentialProvider: Send + Sync {
    /// The current bearer token, if a usable one exists.
    fn token(&self) -> Option<String>;

    /// Drop the current session after an authentication failure.
    fn clear_session(&self);
}
