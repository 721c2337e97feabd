//! Hooks for the end of a session

use std::sync::Arc;

use tracing::warn;

/// Receives notice that the session was torn down.
///
/// Called exactly once per failed refresh, after the token store was cleared.
/// Interactive front ends use it to send the user back to the login entry point.
pub trait SessionHandler: Send + Sync + 'static {
    fn session_expired(&self);
}

/// Handler that does nothing, for embedders that inspect errors instead
pub struct SessionHandlerNoop {}

impl SessionHandler for SessionHandlerNoop {
    fn session_expired(&self) {}
}

impl SessionHandlerNoop {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }
}

/// Handler that logs a prompt to log in again
pub struct LoginRequired {
    pub login_hint: String,
}

impl SessionHandler for LoginRequired {
    fn session_expired(&self) {
        warn!(hint = %self.login_hint, "Session expired, login required");
    }
}
