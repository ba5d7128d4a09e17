use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::env;

use interview_core::model::{
    AudioPayload, AuthedUser, CodeSubmission, FeedbackReport, HrQuestion, HrReview, JdId,
    MatchResult, McqQuestion, ProctorEvent, ProctorFlagSummary, QuestionId, ResumeId, SessionId,
    SessionKind, SubmissionResult,
};

use crate::contract::{
    ApiError, AuthApi, CodeApi, FeedbackApi, HrApi, MatchApi, McqApi, ProctorApi, SessionApi,
};

mod wire;

use wire::{
    AuthRequest, CodeRunRequest, CreateSessionRequest, ErrorBody, JdCreateRequest, JdCreated,
    MatchRequest, McqSubmitRequest, ResumeCreated, SessionCreated,
};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Backend endpoint configuration.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read `INTERVIEW_API_BASE`, falling back to the local dev endpoint.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("INTERVIEW_API_BASE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        Self { base_url }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Real backend reached over HTTP. One shared connection pool; no retries;
/// non-success statuses become `ApiError::Backend` with the service's
/// `detail` message passed through verbatim.
pub struct HttpApi {
    client: Client,
    config: ApiConfig,
}

impl HttpApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.detail)
                .unwrap_or(body);
            return Err(ApiError::Backend {
                status: status.as_u16(),
                detail,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        session_id: &SessionId,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .query(&[("session_id", session_id.as_str())])
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl SessionApi for HttpApi {
    async fn create_session(&self, kind: SessionKind) -> Result<SessionId, ApiError> {
        let response = self
            .client
            .post(self.url("/v1/sessions"))
            .json(&CreateSessionRequest { kind })
            .send()
            .await?;
        let created: SessionCreated = Self::decode(response).await?;
        Ok(created.session_id)
    }
}

#[async_trait]
impl McqApi for HttpApi {
    async fn next_question(&self, session_id: &SessionId) -> Result<McqQuestion, ApiError> {
        self.get_json("/v1/mcq/next", session_id).await
    }

    async fn submit_answer(
        &self,
        session_id: &SessionId,
        question_id: &QuestionId,
        selected_index: usize,
    ) -> Result<SubmissionResult, ApiError> {
        let response = self
            .client
            .post(self.url("/v1/mcq/submit"))
            .json(&McqSubmitRequest {
                session_id,
                question_id,
                selected_index,
            })
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl CodeApi for HttpApi {
    async fn run_code(&self, submission: &CodeSubmission) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(self.url("/v1/code/run"))
            .json(&CodeRunRequest {
                problem_id: &submission.problem_id,
                lang: &submission.language,
                code: &submission.source,
            })
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl HrApi for HttpApi {
    async fn next_hr_question(&self, session_id: &SessionId) -> Result<HrQuestion, ApiError> {
        self.get_json("/v1/hr/ask", session_id).await
    }

    async fn ingest_answer(
        &self,
        session_id: &SessionId,
        audio: &AudioPayload,
        transcript: &str,
    ) -> Result<HrReview, ApiError> {
        let part = Part::bytes(audio.bytes.clone())
            .file_name(audio.file_name.clone())
            .mime_str(&audio.mime_type)?;
        let form = Form::new()
            .part("audio", part)
            .text("transcript", transcript.to_owned());
        let response = self
            .client
            .post(self.url("/v1/hr/ingest"))
            .query(&[("session_id", session_id.as_str())])
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl ProctorApi for HttpApi {
    async fn record_event(&self, event: &ProctorEvent) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/v1/proctor/events"))
            .json(event)
            .send()
            .await?;
        // The body is an acknowledgement blob; only the status matters.
        let _: Value = Self::decode(response).await?;
        Ok(())
    }

    async fn flags(&self, session_id: &SessionId) -> Result<ProctorFlagSummary, ApiError> {
        self.get_json("/v1/proctor/flags", session_id).await
    }
}

#[async_trait]
impl FeedbackApi for HttpApi {
    async fn finalize(&self, session_id: &SessionId) -> Result<FeedbackReport, ApiError> {
        self.get_json("/v1/feedback/finalize", session_id).await
    }
}

#[async_trait]
impl AuthApi for HttpApi {
    async fn exchange(&self, token: &str) -> Result<AuthedUser, ApiError> {
        let response = self
            .client
            .post(self.url("/v1/auth/exchange"))
            .json(&AuthRequest { token })
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl MatchApi for HttpApi {
    async fn create_jd(&self, jd_text: &str) -> Result<JdId, ApiError> {
        let response = self
            .client
            .post(self.url("/v1/jds"))
            .json(&JdCreateRequest { jd_text })
            .send()
            .await?;
        let created: JdCreated = Self::decode(response).await?;
        Ok(created.jd_id)
    }

    async fn upload_resume(&self, bytes: Vec<u8>, file_name: &str) -> Result<ResumeId, ApiError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str("application/octet-stream")?;
        let form = Form::new().part("file", part);
        let response = self
            .client
            .post(self.url("/v1/resumes"))
            .multipart(form)
            .send()
            .await?;
        let created: ResumeCreated = Self::decode(response).await?;
        Ok(created.resume_id)
    }

    async fn match_score(
        &self,
        jd_id: &JdId,
        resume_id: &ResumeId,
    ) -> Result<MatchResult, ApiError> {
        let response = self
            .client
            .post(self.url("/v1/match"))
            .json(&MatchRequest { resume_id, jd_id })
            .send()
            .await?;
        Self::decode(response).await
    }
}
