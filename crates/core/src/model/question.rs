use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{ProblemId, QuestionId};

//
// ─── TECH ROUND ────────────────────────────────────────────────────────────────
//

/// One multiple-choice question as served by the backend.
///
/// Immutable once fetched; a fetched question is superseded only by fetching
/// the next one. `index` and `total` come from the server, which is the sole
/// authority on ordering and exhaustion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqQuestion {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<String>,
    pub index: u32,
    pub total: u32,
}

impl McqQuestion {
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// One-based position for display ("Q2/5").
    #[must_use]
    pub fn display_position(&self) -> (u32, u32) {
        (self.index.saturating_add(1), self.total)
    }
}

/// Outcome of submitting a selected option.
///
/// `next_available` is the continuation signal: `true` means the flow
/// controller must fetch exactly one more question, `false` ends the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub correct: bool,
    pub score_delta: i64,
    pub total_score: i64,
    pub next_available: bool,
}

/// A coding exercise submission: the backend runs it and returns an
/// arbitrary result payload the client displays unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSubmission {
    pub problem_id: ProblemId,
    pub language: String,
    pub source: String,
}

//
// ─── HR ROUND ──────────────────────────────────────────────────────────────────
//

/// One HR voice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HrQuestion {
    pub question: String,
}

/// Backend review of an HR answer: the transcript it kept plus a
/// backend-defined metrics payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrReview {
    pub transcript: String,
    pub metrics: Value,
}

/// Recorded-or-placeholder audio carried as opaque bytes.
///
/// The pipeline transports it, never interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

impl AudioPayload {
    #[must_use]
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Stand-in blob for flows where real capture is unavailable.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(b"fakeaudio".to_vec(), "resp.webm", "audio/webm")
    }
}
