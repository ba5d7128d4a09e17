use std::sync::Arc;

use api::MatchApi;
use interview_core::model::{JdId, MatchResult, ResumeId};

use crate::error::AnalyzeError;

/// Ids and score from one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeOutcome {
    pub jd_id: JdId,
    pub resume_id: ResumeId,
    pub result: MatchResult,
}

/// Resume/JD analysis: register the JD, upload the resume, request the
/// match score. Three sequential awaited calls, each id feeding the next;
/// the scoring itself is entirely server-side.
pub struct AnalyzeService {
    api: Arc<dyn MatchApi>,
}

impl AnalyzeService {
    #[must_use]
    pub fn new(api: Arc<dyn MatchApi>) -> Self {
        Self { api }
    }

    /// Run the full jd -> resume -> match chain.
    ///
    /// # Errors
    ///
    /// Returns `AnalyzeError` if any of the three calls fails; there is no
    /// partial recovery, the chain simply stops.
    pub async fn analyze(
        &self,
        jd_text: &str,
        resume_bytes: Vec<u8>,
        resume_file_name: &str,
    ) -> Result<AnalyzeOutcome, AnalyzeError> {
        let jd_id = self.api.create_jd(jd_text).await?;
        let resume_id = self
            .api
            .upload_resume(resume_bytes, resume_file_name)
            .await?;
        let result = self.api.match_score(&jd_id, &resume_id).await?;
        Ok(AnalyzeOutcome {
            jd_id,
            resume_id,
            result,
        })
    }
}
