#![forbid(unsafe_code)]

pub mod analyze;
pub mod app_services;
pub mod auth;
pub mod error;
pub mod feedback;
pub mod proctor;
pub mod question_flow;
pub mod session_client;
pub mod submission;

pub use interview_core::Clock;

pub use analyze::{AnalyzeOutcome, AnalyzeService};
pub use app_services::AppServices;
pub use auth::AuthService;
pub use error::{
    AnalyzeError, AuthError, FeedbackError, QuestionFlowError, SessionClientError, SubmissionError,
};
pub use feedback::{FeedbackAggregator, SessionFeedback};
pub use proctor::{
    CameraDenied, CameraGrant, CameraProbe, ProctorConfig, ProctorEmitter, ProctorHandle,
    StubCamera,
};
pub use question_flow::{McqAdvance, QuestionFlowController};
pub use session_client::SessionClient;
pub use submission::SubmissionPipeline;
