use std::sync::Arc;

use api::SessionApi;
use interview_core::Clock;
use interview_core::model::{ActiveSession, SessionKind, SessionState, SessionStateError};

use crate::error::SessionClientError;

/// Owns the single current-session slot for a view.
///
/// The session id is minted by the backend on `start` and handed to every
/// other component as an explicit parameter; nothing else about the session
/// is cached locally. Ending a session is an explicit transition, required
/// before a new one may be started.
pub struct SessionClient {
    clock: Clock,
    api: Arc<dyn SessionApi>,
    state: SessionState,
}

impl SessionClient {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn SessionApi>) -> Self {
        Self {
            clock,
            api,
            state: SessionState::default(),
        }
    }

    /// Create a session of the given kind and make it current.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::AlreadyActive` (without touching the
    /// backend) if a session is live, or the create-call failure, in which
    /// case the state stays `Absent` and no session-scoped work may begin.
    pub async fn start(&mut self, kind: SessionKind) -> Result<&ActiveSession, SessionClientError> {
        if self.state.is_active() {
            return Err(SessionStateError::AlreadyActive.into());
        }
        let id = self.api.create_session(kind).await?;
        let session = ActiveSession::new(id, kind, self.clock.now());
        Ok(self.state.activate(session)?)
    }

    /// End the current session, handing it back for teardown bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::NotActive` if no session is live.
    pub fn end(&mut self) -> Result<ActiveSession, SessionClientError> {
        Ok(self.state.deactivate()?)
    }

    #[must_use]
    pub fn session(&self) -> Option<&ActiveSession> {
        self.state.active()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}
