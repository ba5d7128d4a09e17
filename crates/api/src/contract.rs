use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use interview_core::model::{
    AudioPayload, AuthedUser, CodeSubmission, FeedbackReport, HrQuestion, HrReview, JdId,
    MatchResult, McqQuestion, ProctorEvent, ProctorFlagSummary, QuestionId, ResumeId, SessionId,
    SessionKind, SubmissionResult,
};

use crate::fake::InMemoryApi;
use crate::http::{ApiConfig, HttpApi};

/// Errors surfaced by backend adapters.
///
/// `Http` is a transport failure (unreachable, timed out, connection reset);
/// `Backend` is a structured failure the service reported, displayed to the
/// user verbatim. Neither is retried at this layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {detail}")]
    Backend { status: u16, detail: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("internal client error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The backend's rejection of a session id it does not know.
    #[must_use]
    pub fn invalid_session() -> Self {
        ApiError::Backend {
            status: 400,
            detail: "Invalid session_id".into(),
        }
    }

    /// True for structured failures the backend itself reported.
    #[must_use]
    pub fn is_backend_reported(&self) -> bool {
        matches!(self, ApiError::Backend { .. })
    }
}

//
// ─── CAPABILITY CONTRACTS ──────────────────────────────────────────────────────
//

/// Session creation. The returned id is the sole key for everything else.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Create a session of the given kind and return its server-issued id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend is unreachable or rejects the call;
    /// no session-scoped request may be issued until this succeeds.
    async fn create_session(&self, kind: SessionKind) -> Result<SessionId, ApiError>;
}

/// Tech-round MCQ exchange. The server owns ordering and exhaustion.
#[async_trait]
pub trait McqApi: Send + Sync {
    /// Fetch the next unanswered question for the session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Backend` when the session is unknown or exhausted.
    async fn next_question(&self, session_id: &SessionId) -> Result<McqQuestion, ApiError>;

    /// Submit the selected option index for a question.
    ///
    /// The index is not validated locally; an out-of-range value is a
    /// backend error condition.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn submit_answer(
        &self,
        session_id: &SessionId,
        question_id: &QuestionId,
        selected_index: usize,
    ) -> Result<SubmissionResult, ApiError>;
}

/// Coding exercise execution. The result payload is backend-defined.
#[async_trait]
pub trait CodeApi: Send + Sync {
    /// Run submitted source against a problem and return the raw result.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn run_code(&self, submission: &CodeSubmission) -> Result<Value, ApiError>;
}

/// HR-round voice Q&A.
#[async_trait]
pub trait HrApi: Send + Sync {
    /// Fetch the next HR question for the session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn next_hr_question(&self, session_id: &SessionId) -> Result<HrQuestion, ApiError>;

    /// Submit an audio answer plus transcript; multipart on the wire.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure. There is no
    /// partial-submission recovery.
    async fn ingest_answer(
        &self,
        session_id: &SessionId,
        audio: &AudioPayload,
        transcript: &str,
    ) -> Result<HrReview, ApiError>;
}

/// Proctoring event sink and flag readback.
#[async_trait]
pub trait ProctorApi: Send + Sync {
    /// Record one proctoring event.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on failure; the emitter treats any failure as an
    /// accepted at-most-once drop.
    async fn record_event(&self, event: &ProctorEvent) -> Result<(), ApiError>;

    /// Fetch the accumulated flag summary for a session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Backend` for an unknown session id.
    async fn flags(&self, session_id: &SessionId) -> Result<ProctorFlagSummary, ApiError>;
}

/// Finalized scoring report.
#[async_trait]
pub trait FeedbackApi: Send + Sync {
    /// Fetch the finalized report for a session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Backend` for an unknown session id.
    async fn finalize(&self, session_id: &SessionId) -> Result<FeedbackReport, ApiError>;
}

/// Mock token exchange.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange a token for a user identity.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn exchange(&self, token: &str) -> Result<AuthedUser, ApiError>;
}

/// Resume/JD registration and match scoring.
#[async_trait]
pub trait MatchApi: Send + Sync {
    /// Register a job description, returning its id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn create_jd(&self, jd_text: &str) -> Result<JdId, ApiError>;

    /// Upload a resume file, returning its id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn upload_resume(&self, bytes: Vec<u8>, file_name: &str) -> Result<ResumeId, ApiError>;

    /// Compute the match score between a registered JD and resume.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn match_score(
        &self,
        jd_id: &JdId,
        resume_id: &ResumeId,
    ) -> Result<MatchResult, ApiError>;
}

//
// ─── AGGREGATE HANDLE ──────────────────────────────────────────────────────────
//

/// Aggregates every backend capability behind trait objects so services can
/// be wired against the HTTP adapter or the in-memory fake interchangeably.
#[derive(Clone)]
pub struct Api {
    pub sessions: Arc<dyn SessionApi>,
    pub mcq: Arc<dyn McqApi>,
    pub code: Arc<dyn CodeApi>,
    pub hr: Arc<dyn HrApi>,
    pub proctor: Arc<dyn ProctorApi>,
    pub feedback: Arc<dyn FeedbackApi>,
    pub auth: Arc<dyn AuthApi>,
    pub matching: Arc<dyn MatchApi>,
}

impl Api {
    /// Wrap a single backend implementing every capability.
    pub fn from_impl<T>(backend: Arc<T>) -> Self
    where
        T: SessionApi
            + McqApi
            + CodeApi
            + HrApi
            + ProctorApi
            + FeedbackApi
            + AuthApi
            + MatchApi
            + 'static,
    {
        Self {
            sessions: backend.clone(),
            mcq: backend.clone(),
            code: backend.clone(),
            hr: backend.clone(),
            proctor: backend.clone(),
            feedback: backend.clone(),
            auth: backend.clone(),
            matching: backend,
        }
    }

    /// Backend fake with in-process state, for tests and offline development.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_impl(Arc::new(InMemoryApi::new()))
    }

    /// Real backend over HTTP.
    #[must_use]
    pub fn http(config: ApiConfig) -> Self {
        Self::from_impl(Arc::new(HttpApi::new(config)))
    }
}
