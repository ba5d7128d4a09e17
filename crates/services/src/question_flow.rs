use std::sync::Arc;

use api::McqApi;
use interview_core::model::{McqQuestion, SessionId, SubmissionResult};

use crate::error::QuestionFlowError;

/// Outcome of answering the current question.
///
/// `next` is `Some` exactly when the result signalled availability and the
/// controller auto-fetched the follow-up.
#[derive(Debug, Clone, PartialEq)]
pub struct McqAdvance {
    pub result: SubmissionResult,
    pub next: Option<McqQuestion>,
}

/// Drives the strictly sequential tech-round MCQ loop.
///
/// The server is authoritative for ordering and exhaustion; the controller
/// holds nothing beyond the currently displayed question. Once an answer is
/// accepted the question is gone — no skipping, no re-answering.
pub struct QuestionFlowController {
    api: Arc<dyn McqApi>,
    current: Option<McqQuestion>,
}

impl QuestionFlowController {
    #[must_use]
    pub fn new(api: Arc<dyn McqApi>) -> Self {
        Self { api, current: None }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&McqQuestion> {
        self.current.as_ref()
    }

    /// Fetch the server's next unanswered question and make it current.
    ///
    /// # Errors
    ///
    /// Returns `QuestionFlowError::Api` on transport failure or when the
    /// backend reports the session unknown or exhausted.
    pub async fn fetch_next(
        &mut self,
        session_id: &SessionId,
    ) -> Result<&McqQuestion, QuestionFlowError> {
        let question = self.api.next_question(session_id).await?;
        Ok(self.current.insert(question))
    }

    /// Submit the selected option for the current question.
    ///
    /// The index is forwarded unvalidated; an out-of-range value is a backend
    /// error condition. On an accepted submission the question is discarded
    /// immediately, then — driven solely by `next_available` — exactly one
    /// follow-up fetch happens (or none). A transport failure before
    /// acceptance leaves the question current so the action can be retried.
    ///
    /// # Errors
    ///
    /// Returns `QuestionFlowError::NoCurrentQuestion` if nothing is
    /// displayed, or `QuestionFlowError::Api` for submit/fetch failures.
    pub async fn submit(
        &mut self,
        session_id: &SessionId,
        selected_index: usize,
    ) -> Result<McqAdvance, QuestionFlowError> {
        let question = self
            .current
            .take()
            .ok_or(QuestionFlowError::NoCurrentQuestion)?;

        let result = match self
            .api
            .submit_answer(session_id, &question.id, selected_index)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                self.current = Some(question);
                return Err(err.into());
            }
        };

        let next = if result.next_available {
            let question = self.api.next_question(session_id).await?;
            self.current = Some(question.clone());
            Some(question)
        } else {
            None
        };

        Ok(McqAdvance { result, next })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{InMemoryApi, SessionApi};
    use interview_core::model::SessionKind;

    #[tokio::test]
    async fn submit_without_question_errors() {
        let backend = Arc::new(InMemoryApi::new());
        let session = backend.create_session(SessionKind::Tech).await.unwrap();
        let mut flow = QuestionFlowController::new(backend);
        assert!(matches!(
            flow.submit(&session, 0).await.unwrap_err(),
            QuestionFlowError::NoCurrentQuestion
        ));
    }

    #[tokio::test]
    async fn question_is_discarded_after_submission() {
        let backend = Arc::new(InMemoryApi::new());
        let session = backend.create_session(SessionKind::Tech).await.unwrap();
        let mut flow = QuestionFlowController::new(backend);

        flow.fetch_next(&session).await.unwrap();
        let first_id = flow.current_question().unwrap().id.clone();
        let advance = flow.submit(&session, 0).await.unwrap();
        assert!(advance.result.next_available);
        assert_ne!(flow.current_question().unwrap().id, first_id);
    }

    #[tokio::test]
    async fn out_of_range_index_is_a_backend_error() {
        let backend = Arc::new(InMemoryApi::new());
        let session = backend.create_session(SessionKind::Tech).await.unwrap();
        let mut flow = QuestionFlowController::new(backend);

        flow.fetch_next(&session).await.unwrap();
        let err = flow.submit(&session, 99).await.unwrap_err();
        assert!(matches!(err, QuestionFlowError::Api(_)));
    }
}
