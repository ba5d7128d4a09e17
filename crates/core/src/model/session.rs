use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::SessionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("a session is already active; end it before starting a new one")]
    AlreadyActive,

    #[error("no active session")]
    NotActive,
}

/// The round a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// Technical round: MCQs plus a coding exercise.
    Tech,
    /// HR round: voice questions answered with audio + transcript.
    Hr,
}

impl SessionKind {
    /// Wire name for the kind, matching the backend's session type field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::Tech => "tech",
            SessionKind::Hr => "hr",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A live session as observed by the client.
///
/// `started_at` is the locally-observed creation time; the backend keeps its
/// own authoritative timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    id: SessionId,
    kind: SessionKind,
    started_at: DateTime<Utc>,
}

impl ActiveSession {
    #[must_use]
    pub fn new(id: SessionId, kind: SessionKind, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            kind,
            started_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// Explicit session lifecycle owned by the session client.
///
/// Exactly one session may be active at a time; ending it is a required,
/// explicit transition rather than an implicit side effect of teardown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Absent,
    Active(ActiveSession),
}

impl SessionState {
    /// Transition `Absent -> Active`.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::AlreadyActive` if a session is live.
    pub fn activate(&mut self, session: ActiveSession) -> Result<&ActiveSession, SessionStateError> {
        if self.is_active() {
            return Err(SessionStateError::AlreadyActive);
        }
        *self = SessionState::Active(session);
        match self {
            SessionState::Active(s) => Ok(s),
            SessionState::Absent => Err(SessionStateError::NotActive),
        }
    }

    /// Transition `Active -> Absent`, handing back the ended session.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::NotActive` if no session is live.
    pub fn deactivate(&mut self) -> Result<ActiveSession, SessionStateError> {
        match std::mem::take(self) {
            SessionState::Active(session) => Ok(session),
            SessionState::Absent => Err(SessionStateError::NotActive),
        }
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActiveSession> {
        match self {
            SessionState::Active(session) => Some(session),
            SessionState::Absent => None,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active(_))
    }
}
