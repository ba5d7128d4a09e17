use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::ProctorEventKind;

/// Finalized scoring report for a session.
///
/// `scores` is a backend-defined map displayed verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub summary: String,
    pub scores: Value,
}

/// One event as echoed back by the flags endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedEvent {
    #[serde(rename = "type")]
    pub kind: ProctorEventKind,
    #[serde(default)]
    pub meta: Value,
}

/// Accumulated proctoring flags for a session.
///
/// The backend owns the event history and the flag derivation; the client
/// only displays this next to the feedback report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProctorFlagSummary {
    pub events: Vec<FlaggedEvent>,
    pub hard_flag: bool,
    pub soft_flag_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_summary_parses_backend_shape() {
        let json = r#"{
            "events": [
                {"type": "tab_blur", "meta": {}},
                {"type": "webcam_off", "meta": {}}
            ],
            "hard_flag": true,
            "soft_flag_count": 1
        }"#;
        let summary: ProctorFlagSummary = serde_json::from_str(json).unwrap();
        assert!(summary.hard_flag);
        assert_eq!(summary.soft_flag_count, 1);
        assert_eq!(summary.events[0].kind, ProctorEventKind::TabBlur);
    }

    #[test]
    fn report_scores_stay_opaque() {
        let json = r#"{"summary": "MCQ score=2; HR turns=1.", "scores": {"mcq": 2, "hr": 1}}"#;
        let report: FeedbackReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.scores["mcq"], 2);
    }
}
