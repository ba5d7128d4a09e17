use std::sync::Arc;

use serde_json::Value;

use api::{CodeApi, HrApi};
use interview_core::model::{AudioPayload, CodeSubmission, HrQuestion, HrReview, SessionId};

use crate::error::SubmissionError;

/// Dev-path transcript used when the user supplies none.
pub const PLACEHOLDER_TRANSCRIPT: &str = "My experience includes Python and SQL projects...";

/// Packages free-form answers for the HR and coding flows.
///
/// Stateless per call: no retry, no resumability, no chunking. A failed call
/// surfaces as an error with no partial-submission recovery.
pub struct SubmissionPipeline {
    hr: Arc<dyn HrApi>,
    code: Arc<dyn CodeApi>,
}

impl SubmissionPipeline {
    #[must_use]
    pub fn new(hr: Arc<dyn HrApi>, code: Arc<dyn CodeApi>) -> Self {
        Self { hr, code }
    }

    /// Fetch the next HR question for the session.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError` on transport or backend failure.
    pub async fn next_hr_question(
        &self,
        session_id: &SessionId,
    ) -> Result<HrQuestion, SubmissionError> {
        Ok(self.hr.next_hr_question(session_id).await?)
    }

    /// Bundle an audio payload and transcript into a multipart submission.
    ///
    /// The audio is transported, never interpreted. An empty transcript is
    /// replaced by the documented dev placeholder. HR answers are single-shot
    /// per question: no automatic follow-up happens on success.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError` on transport or backend failure.
    pub async fn submit_hr_answer(
        &self,
        session_id: &SessionId,
        audio: &AudioPayload,
        transcript: &str,
    ) -> Result<HrReview, SubmissionError> {
        let transcript = if transcript.trim().is_empty() {
            PLACEHOLDER_TRANSCRIPT
        } else {
            transcript
        };
        Ok(self.hr.ingest_answer(session_id, audio, transcript).await?)
    }

    /// Run submitted source against a problem; the result payload is
    /// backend-defined and returned unmodified.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError` on transport or backend failure.
    pub async fn run_code(&self, submission: &CodeSubmission) -> Result<Value, SubmissionError> {
        Ok(self.code.run_code(submission).await?)
    }
}
