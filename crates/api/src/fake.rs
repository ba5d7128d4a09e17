use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use interview_core::model::{
    AudioPayload, AuthedUser, CodeSubmission, FeedbackReport, FlaggedEvent, HrQuestion, HrReview,
    JdId, MatchResult, McqQuestion, ProctorEvent, ProctorEventKind, ProctorFlagSummary, QuestionId,
    ResumeId, SessionId, SessionKind, SkillScore, SubmissionResult,
};

use crate::contract::{
    ApiError, AuthApi, CodeApi, FeedbackApi, HrApi, MatchApi, McqApi, ProctorApi, SessionApi,
};

const HR_QUESTIONS: [&str; 3] = [
    "Tell me about a time you handled a conflict.",
    "Describe your most challenging project.",
    "Why do you want this role?",
];

const SKILL_KEYWORDS: [(&str, &str); 3] = [
    ("Python", "python"),
    ("Sql", "sql"),
    ("React", "react"),
];

#[derive(Debug, Clone)]
struct BankQuestion {
    id: &'static str,
    question: &'static str,
    options: [&'static str; 4],
    answer_index: usize,
}

fn default_bank() -> Vec<BankQuestion> {
    vec![
        BankQuestion {
            id: "q_py_gil",
            question: "What does Python's GIL serialize?",
            options: [
                "Bytecode execution across threads",
                "Disk I/O",
                "Garbage collection only",
                "Module imports only",
            ],
            answer_index: 0,
        },
        BankQuestion {
            id: "q_sql_join",
            question: "Which JOIN keeps unmatched rows from the left table?",
            options: ["INNER", "LEFT OUTER", "CROSS", "FULL"],
            answer_index: 1,
        },
        BankQuestion {
            id: "q_react_key",
            question: "Why do React list items need a key prop?",
            options: [
                "Styling",
                "Event bubbling",
                "Reconciliation identity",
                "Server rendering",
            ],
            answer_index: 2,
        },
    ]
}

#[derive(Debug, Default)]
struct SessionRecord {
    cursor: usize,
    score: i64,
    hr_turns: usize,
}

#[derive(Default)]
struct State {
    next_id: u64,
    sessions: HashMap<String, SessionRecord>,
    proctor: HashMap<String, Vec<ProctorEvent>>,
    jds: HashMap<String, String>,
    resumes: HashMap<String, String>,
    fail_proctor_sends: bool,
}

/// In-process backend fake for tests and offline development.
///
/// Reproduces the dev backend's observable contract: a fixed MCQ bank with a
/// per-session cursor and running score, rotating HR questions, a per-session
/// proctor event log with `hard_flag`/`soft_flag_count` derivation, and a
/// 400 "Invalid session_id" for unknown sessions.
#[derive(Clone, Default)]
pub struct InMemoryApi {
    state: Arc<Mutex<State>>,
    bank: Arc<Vec<BankQuestion>>,
}

impl InMemoryApi {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            bank: Arc::new(default_bank()),
        }
    }

    /// Number of questions the MCQ bank serves per session.
    #[must_use]
    pub fn question_total(&self) -> usize {
        self.bank.len()
    }

    /// Make every `record_event` call fail, to exercise the emitter's
    /// at-most-once drop policy.
    pub fn fail_proctor_sends(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_proctor_sends = fail;
        }
    }

    /// Events recorded for a session, in arrival order.
    #[must_use]
    pub fn recorded_events(&self, session_id: &SessionId) -> Vec<ProctorEvent> {
        self.state
            .lock()
            .map(|state| {
                state
                    .proctor
                    .get(session_id.as_str())
                    .cloned()
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, ApiError> {
        self.state
            .lock()
            .map_err(|e| ApiError::Internal(e.to_string()))
    }

    fn mint(state: &mut State, prefix: &str) -> String {
        state.next_id += 1;
        format!("{prefix}_{:08x}", state.next_id)
    }
}

#[async_trait]
impl SessionApi for InMemoryApi {
    async fn create_session(&self, _kind: SessionKind) -> Result<SessionId, ApiError> {
        let mut state = self.lock()?;
        let id = Self::mint(&mut state, "sess");
        state.sessions.insert(id.clone(), SessionRecord::default());
        Ok(SessionId::new(id))
    }
}

#[async_trait]
impl McqApi for InMemoryApi {
    async fn next_question(&self, session_id: &SessionId) -> Result<McqQuestion, ApiError> {
        let state = self.lock()?;
        let record = state
            .sessions
            .get(session_id.as_str())
            .ok_or_else(ApiError::invalid_session)?;
        let Some(q) = self.bank.get(record.cursor) else {
            return Err(ApiError::Backend {
                status: 404,
                detail: "No more questions".into(),
            });
        };
        Ok(McqQuestion {
            id: QuestionId::new(q.id),
            question: q.question.to_owned(),
            options: q.options.iter().map(|o| (*o).to_owned()).collect(),
            index: record.cursor as u32,
            total: self.bank.len() as u32,
        })
    }

    async fn submit_answer(
        &self,
        session_id: &SessionId,
        _question_id: &QuestionId,
        selected_index: usize,
    ) -> Result<SubmissionResult, ApiError> {
        let mut state = self.lock()?;
        let bank_len = self.bank.len();
        let record = state
            .sessions
            .get_mut(session_id.as_str())
            .ok_or_else(ApiError::invalid_session)?;
        let Some(q) = self.bank.get(record.cursor) else {
            return Err(ApiError::Backend {
                status: 404,
                detail: "No more questions".into(),
            });
        };
        if selected_index >= q.options.len() {
            return Err(ApiError::Backend {
                status: 422,
                detail: format!("selected_index {selected_index} out of range"),
            });
        }
        let correct = selected_index == q.answer_index;
        let delta = i64::from(correct);
        record.score += delta;
        record.cursor += 1;
        Ok(SubmissionResult {
            correct,
            score_delta: delta,
            total_score: record.score,
            next_available: record.cursor < bank_len,
        })
    }
}

#[async_trait]
impl CodeApi for InMemoryApi {
    async fn run_code(&self, submission: &CodeSubmission) -> Result<Value, ApiError> {
        if submission.problem_id.as_str() != "sum_two" {
            return Err(ApiError::Backend {
                status: 404,
                detail: "Unknown problem".into(),
            });
        }
        if submission.language != "python" {
            return Err(ApiError::Backend {
                status: 400,
                detail: "Only python supported in dev mode".into(),
            });
        }
        // Sandboxing lives server-side; the fake only echoes the result shape.
        Ok(json!({
            "passed": 2,
            "total": 2,
            "results": [
                {"ok": true, "got": 3, "want": 3},
                {"ok": true, "got": 0, "want": 0}
            ],
            "error": null
        }))
    }
}

#[async_trait]
impl HrApi for InMemoryApi {
    async fn next_hr_question(&self, session_id: &SessionId) -> Result<HrQuestion, ApiError> {
        let state = self.lock()?;
        let record = state
            .sessions
            .get(session_id.as_str())
            .ok_or_else(ApiError::invalid_session)?;
        let idx = record.hr_turns % HR_QUESTIONS.len();
        Ok(HrQuestion {
            question: HR_QUESTIONS[idx].to_owned(),
        })
    }

    async fn ingest_answer(
        &self,
        session_id: &SessionId,
        _audio: &AudioPayload,
        transcript: &str,
    ) -> Result<HrReview, ApiError> {
        let mut state = self.lock()?;
        let record = state
            .sessions
            .get_mut(session_id.as_str())
            .ok_or_else(ApiError::invalid_session)?;
        let tx = if transcript.is_empty() {
            "[audio received]".to_owned()
        } else {
            transcript.to_owned()
        };
        let words = tx.split_whitespace().count() as u64;
        record.hr_turns += 1;
        Ok(HrReview {
            transcript: tx,
            metrics: json!({
                "words_per_min_approx": words.clamp(60, 180),
                "filler_ratio_approx": 0.05,
                "sentiment_approx": "neutral"
            }),
        })
    }
}

#[async_trait]
impl ProctorApi for InMemoryApi {
    async fn record_event(&self, event: &ProctorEvent) -> Result<(), ApiError> {
        let mut state = self.lock()?;
        if state.fail_proctor_sends {
            return Err(ApiError::Backend {
                status: 503,
                detail: "proctor sink unavailable".into(),
            });
        }
        state
            .proctor
            .entry(event.session_id.as_str().to_owned())
            .or_default()
            .push(event.clone());
        Ok(())
    }

    async fn flags(&self, session_id: &SessionId) -> Result<ProctorFlagSummary, ApiError> {
        let state = self.lock()?;
        if !state.sessions.contains_key(session_id.as_str()) {
            return Err(ApiError::invalid_session());
        }
        let events = state
            .proctor
            .get(session_id.as_str())
            .cloned()
            .unwrap_or_default();
        let hard_flag = events
            .iter()
            .any(|e| e.kind == ProctorEventKind::WebcamOff);
        let soft_flag_count = events
            .iter()
            .filter(|e| e.kind == ProctorEventKind::TabBlur)
            .count() as u32;
        Ok(ProctorFlagSummary {
            events: events
                .into_iter()
                .map(|e| FlaggedEvent {
                    kind: e.kind,
                    meta: Value::Object(e.meta),
                })
                .collect(),
            hard_flag,
            soft_flag_count,
        })
    }
}

#[async_trait]
impl FeedbackApi for InMemoryApi {
    async fn finalize(&self, session_id: &SessionId) -> Result<FeedbackReport, ApiError> {
        let state = self.lock()?;
        let record = state
            .sessions
            .get(session_id.as_str())
            .ok_or_else(ApiError::invalid_session)?;
        let hr_score = i64::from(record.hr_turns > 0);
        Ok(FeedbackReport {
            summary: format!(
                "MCQ score={}; HR turns={}.",
                record.score, record.hr_turns
            ),
            scores: json!({"mcq": record.score, "hr": hr_score}),
        })
    }
}

#[async_trait]
impl AuthApi for InMemoryApi {
    async fn exchange(&self, token: &str) -> Result<AuthedUser, ApiError> {
        let user_id = if token.is_empty() {
            "u_demo".to_owned()
        } else {
            let tail: String = token
                .chars()
                .rev()
                .take(6)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("u_{tail}")
        };
        Ok(AuthedUser {
            jwt: format!("demo.jwt.{user_id}"),
            user: json!({"id": user_id, "role": "user"}),
        })
    }
}

#[async_trait]
impl MatchApi for InMemoryApi {
    async fn create_jd(&self, jd_text: &str) -> Result<JdId, ApiError> {
        let mut state = self.lock()?;
        let id = Self::mint(&mut state, "jd");
        state.jds.insert(id.clone(), jd_text.to_owned());
        Ok(JdId::new(id))
    }

    async fn upload_resume(&self, bytes: Vec<u8>, _file_name: &str) -> Result<ResumeId, ApiError> {
        let mut state = self.lock()?;
        let id = Self::mint(&mut state, "res");
        let text = String::from_utf8_lossy(&bytes).into_owned();
        state.resumes.insert(id.clone(), text);
        Ok(ResumeId::new(id))
    }

    async fn match_score(
        &self,
        jd_id: &JdId,
        resume_id: &ResumeId,
    ) -> Result<MatchResult, ApiError> {
        let state = self.lock()?;
        let (Some(jd), Some(resume)) = (
            state.jds.get(jd_id.as_str()),
            state.resumes.get(resume_id.as_str()),
        ) else {
            return Ok(MatchResult {
                score: 0.0,
                skills: Vec::new(),
                gaps: vec!["Invalid resume_id or jd_id".to_owned()],
            });
        };

        // The real scoring model is server-side; the fake uses plain keyword
        // overlap so tests get stable, non-trivial output.
        let jd_lower = jd.to_lowercase();
        let resume_lower = resume.to_lowercase();
        let mut skills = Vec::new();
        for (name, keyword) in SKILL_KEYWORDS {
            if !jd_lower.contains(keyword) {
                continue;
            }
            let level = if resume_lower.contains(keyword) {
                "high"
            } else {
                "low"
            };
            skills.push(SkillScore {
                name: name.to_owned(),
                level: level.to_owned(),
            });
        }
        let named = skills.len() as f64;
        let covered = skills.iter().filter(|s| s.level == "high").count() as f64;
        let score = if named > 0.0 { covered / named } else { 0.0 };
        let gaps = skills
            .iter()
            .filter(|s| s.level == "low")
            .map(|s| s.name.clone())
            .collect();
        Ok(MatchResult {
            score,
            skills,
            gaps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cursor_walks_the_bank_and_exhausts() {
        let backend = InMemoryApi::new();
        let session = backend.create_session(SessionKind::Tech).await.unwrap();

        let total = backend.question_total();
        for expected_index in 0..total {
            let q = backend.next_question(&session).await.unwrap();
            assert_eq!(q.index as usize, expected_index);
            assert_eq!(q.total as usize, total);
            let result = backend.submit_answer(&session, &q.id, 0).await.unwrap();
            assert_eq!(result.next_available, expected_index + 1 < total);
        }

        let err = backend.next_question(&session).await.unwrap_err();
        assert!(matches!(err, ApiError::Backend { status: 404, .. }));
    }

    #[tokio::test]
    async fn unknown_session_is_rejected() {
        let backend = InMemoryApi::new();
        let bogus = SessionId::new("sess_nope");
        assert!(matches!(
            backend.next_question(&bogus).await.unwrap_err(),
            ApiError::Backend { status: 400, .. }
        ));
        assert!(matches!(
            backend.flags(&bogus).await.unwrap_err(),
            ApiError::Backend { status: 400, .. }
        ));
        assert!(matches!(
            backend.finalize(&bogus).await.unwrap_err(),
            ApiError::Backend { status: 400, .. }
        ));
    }

    #[tokio::test]
    async fn flags_derive_from_recorded_events() {
        let backend = InMemoryApi::new();
        let session = backend.create_session(SessionKind::Tech).await.unwrap();
        for kind in [
            ProctorEventKind::TabBlur,
            ProctorEventKind::TabFocus,
            ProctorEventKind::TabBlur,
            ProctorEventKind::WebcamOff,
        ] {
            backend
                .record_event(&ProctorEvent::new(session.clone(), kind))
                .await
                .unwrap();
        }

        let summary = backend.flags(&session).await.unwrap();
        assert!(summary.hard_flag);
        assert_eq!(summary.soft_flag_count, 2);
        assert_eq!(summary.events.len(), 4);
    }

    #[tokio::test]
    async fn hr_questions_rotate_per_turn() {
        let backend = InMemoryApi::new();
        let session = backend.create_session(SessionKind::Hr).await.unwrap();

        let first = backend.next_hr_question(&session).await.unwrap();
        backend
            .ingest_answer(&session, &AudioPayload::placeholder(), "answer one")
            .await
            .unwrap();
        let second = backend.next_hr_question(&session).await.unwrap();
        assert_ne!(first.question, second.question);
    }

    #[tokio::test]
    async fn ingest_substitutes_placeholder_transcript() {
        let backend = InMemoryApi::new();
        let session = backend.create_session(SessionKind::Hr).await.unwrap();
        let review = backend
            .ingest_answer(&session, &AudioPayload::placeholder(), "")
            .await
            .unwrap();
        assert_eq!(review.transcript, "[audio received]");
    }

    #[tokio::test]
    async fn match_flow_scores_keyword_overlap() {
        let backend = InMemoryApi::new();
        let jd = backend
            .create_jd("Backend developer: Python + SQL")
            .await
            .unwrap();
        let resume = backend
            .upload_resume(b"python, sql projects".to_vec(), "resume.txt")
            .await
            .unwrap();
        let result = backend.match_score(&jd, &resume).await.unwrap();
        assert!(result.score > 0.9);
        assert!(result.gaps.is_empty());

        let bogus = backend
            .match_score(&JdId::new("jd_nope"), &resume)
            .await
            .unwrap();
        assert_eq!(bogus.score, 0.0);
        assert_eq!(bogus.gaps, vec!["Invalid resume_id or jd_id".to_owned()]);
    }

    #[tokio::test]
    async fn code_run_rejects_unknown_problem_and_language() {
        let backend = InMemoryApi::new();
        let unknown = CodeSubmission {
            problem_id: interview_core::model::ProblemId::new("fib"),
            language: "python".into(),
            source: "def solve(a,b): return a+b".into(),
        };
        assert!(matches!(
            backend.run_code(&unknown).await.unwrap_err(),
            ApiError::Backend { status: 404, .. }
        ));

        let wrong_lang = CodeSubmission {
            problem_id: interview_core::model::ProblemId::new("sum_two"),
            language: "rust".into(),
            source: "fn solve(a: i64, b: i64) -> i64 { a + b }".into(),
        };
        assert!(matches!(
            backend.run_code(&wrong_lang).await.unwrap_err(),
            ApiError::Backend { status: 400, .. }
        ));
    }
}
