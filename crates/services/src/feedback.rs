use std::sync::Arc;

use api::{FeedbackApi, ProctorApi};
use interview_core::model::{FeedbackReport, ProctorFlagSummary, SessionId};

use crate::error::FeedbackError;

/// The two read-only aggregates for a session, paired for display.
///
/// Each half fails independently; one failing never affects the other.
#[derive(Debug)]
pub struct SessionFeedback {
    pub report: Result<FeedbackReport, FeedbackError>,
    pub flags: Result<ProctorFlagSummary, FeedbackError>,
}

/// Fetches the finalized scoring report and the proctoring-flag summary for
/// a session and presents them side by side. No correlation, scoring, or
/// cross-validation happens here; both aggregates are server-derived.
pub struct FeedbackAggregator {
    feedback: Arc<dyn FeedbackApi>,
    proctor: Arc<dyn ProctorApi>,
}

impl FeedbackAggregator {
    #[must_use]
    pub fn new(feedback: Arc<dyn FeedbackApi>, proctor: Arc<dyn ProctorApi>) -> Self {
        Self { feedback, proctor }
    }

    /// Fetch both aggregates for the session.
    pub async fn fetch(&self, session_id: &SessionId) -> SessionFeedback {
        let (report, flags) = tokio::join!(
            self.feedback.finalize(session_id),
            self.proctor.flags(session_id)
        );
        SessionFeedback {
            report: report.map_err(Into::into),
            flags: flags.map_err(Into::into),
        }
    }
}
