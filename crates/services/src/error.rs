//! Shared error types for the services crate.

use thiserror::Error;

use api::ApiError;
use interview_core::model::SessionStateError;

/// Errors emitted by `SessionClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionClientError {
    #[error(transparent)]
    State(#[from] SessionStateError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `QuestionFlowController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionFlowError {
    #[error("no question is currently displayed")]
    NoCurrentQuestion,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `SubmissionPipeline`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `FeedbackAggregator`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FeedbackError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `AnalyzeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalyzeError {
    #[error(transparent)]
    Api(#[from] ApiError),
}
