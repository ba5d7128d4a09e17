//! Request/response bodies for the HTTP backend.
//!
//! Responses that already have a domain shape (`McqQuestion`,
//! `SubmissionResult`, `HrReview`, ...) deserialize straight into the core
//! types; only envelopes unique to the wire live here.

use serde::{Deserialize, Serialize};

use interview_core::model::{JdId, ProblemId, QuestionId, ResumeId, SessionId, SessionKind};

#[derive(Debug, Serialize)]
pub(crate) struct CreateSessionRequest {
    #[serde(rename = "type")]
    pub kind: SessionKind,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionCreated {
    pub session_id: SessionId,
}

#[derive(Debug, Serialize)]
pub(crate) struct McqSubmitRequest<'a> {
    pub session_id: &'a SessionId,
    pub question_id: &'a QuestionId,
    pub selected_index: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct CodeRunRequest<'a> {
    pub problem_id: &'a ProblemId,
    pub lang: &'a str,
    pub code: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuthRequest<'a> {
    pub token: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct JdCreateRequest<'a> {
    pub jd_text: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JdCreated {
    pub jd_id: JdId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResumeCreated {
    pub resume_id: ResumeId,
}

#[derive(Debug, Serialize)]
pub(crate) struct MatchRequest<'a> {
    pub resume_id: &'a ResumeId,
    pub jd_id: &'a JdId,
}

/// FastAPI-style error envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_session_uses_type_field() {
        let body = CreateSessionRequest {
            kind: SessionKind::Tech,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"type": "tech"}));
    }

    #[test]
    fn submit_request_matches_backend_schema() {
        let session_id = SessionId::new("sess_1");
        let question_id = QuestionId::new("q_sql_join");
        let body = McqSubmitRequest {
            session_id: &session_id,
            question_id: &question_id,
            selected_index: 1,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["session_id"], "sess_1");
        assert_eq!(json["question_id"], "q_sql_join");
        assert_eq!(json["selected_index"], 1);
    }

    #[test]
    fn code_run_uses_short_field_names() {
        let problem_id = ProblemId::new("sum_two");
        let body = CodeRunRequest {
            problem_id: &problem_id,
            lang: "python",
            code: "def solve(a,b):\n    return a+b",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["lang"], "python");
        assert!(json["code"].as_str().unwrap().contains("solve"));
    }

    #[test]
    fn error_body_parses_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "Invalid session_id"}"#).unwrap();
        assert_eq!(body.detail, "Invalid session_id");
    }
}
