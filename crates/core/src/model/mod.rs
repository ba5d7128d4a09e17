mod account;
mod feedback;
mod ids;
mod matching;
mod proctor;
mod question;
mod session;

pub use account::AuthedUser;
pub use feedback::{FeedbackReport, FlaggedEvent, ProctorFlagSummary};
pub use ids::{JdId, ParseIdError, ProblemId, QuestionId, ResumeId, SessionId};
pub use matching::{MatchResult, SkillScore};
pub use proctor::{ProctorEvent, ProctorEventKind, VisibilitySignal};
pub use question::{
    AudioPayload, CodeSubmission, HrQuestion, HrReview, McqQuestion, SubmissionResult,
};
pub use session::{ActiveSession, SessionKind, SessionState, SessionStateError};
