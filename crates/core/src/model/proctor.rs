use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::model::SessionId;

//
// ─── PROCTOR EVENTS ────────────────────────────────────────────────────────────
//

/// Integrity signals the client reports while a session is live.
///
/// Timestamps are assigned by the receiving backend; the client sends the
/// event and forgets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProctorEventKind {
    /// The interview tab lost visibility.
    TabBlur,
    /// The interview tab regained visibility.
    TabFocus,
    /// The camera permission probe was granted.
    WebcamOn,
    /// The camera permission probe was denied or the device is unavailable.
    WebcamOff,
}

impl ProctorEventKind {
    /// Wire name for the event type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProctorEventKind::TabBlur => "tab_blur",
            ProctorEventKind::TabFocus => "tab_focus",
            ProctorEventKind::WebcamOn => "webcam_on",
            ProctorEventKind::WebcamOff => "webcam_off",
        }
    }
}

impl fmt::Display for ProctorEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One proctoring event, tagged with the session it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProctorEvent {
    pub session_id: SessionId,
    #[serde(rename = "type")]
    pub kind: ProctorEventKind,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl ProctorEvent {
    /// A plain event with no metadata, the common case.
    #[must_use]
    pub fn new(session_id: SessionId, kind: ProctorEventKind) -> Self {
        Self {
            session_id,
            kind,
            meta: Map::new(),
        }
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }
}

//
// ─── PLATFORM SIGNALS ──────────────────────────────────────────────────────────
//

/// Raw visibility transition from the platform layer, before it is mapped to
/// a wire event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilitySignal {
    Hidden,
    Visible,
}

impl VisibilitySignal {
    /// The wire event a transition maps to. Every transition is reported;
    /// there is no debouncing.
    #[must_use]
    pub fn event_kind(self) -> ProctorEventKind {
        match self {
            VisibilitySignal::Hidden => ProctorEventKind::TabBlur,
            VisibilitySignal::Visible => ProctorEventKind::TabFocus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_wire_names() {
        assert_eq!(ProctorEventKind::TabBlur.as_str(), "tab_blur");
        assert_eq!(ProctorEventKind::WebcamOff.as_str(), "webcam_off");
        assert_eq!(
            serde_json::to_string(&ProctorEventKind::WebcamOn).unwrap(),
            "\"webcam_on\""
        );
    }

    #[test]
    fn visibility_maps_to_blur_and_focus() {
        assert_eq!(
            VisibilitySignal::Hidden.event_kind(),
            ProctorEventKind::TabBlur
        );
        assert_eq!(
            VisibilitySignal::Visible.event_kind(),
            ProctorEventKind::TabFocus
        );
    }

    #[test]
    fn event_serializes_with_type_field() {
        let event = ProctorEvent::new(SessionId::new("sess_1"), ProctorEventKind::TabBlur);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["session_id"], "sess_1");
        assert_eq!(json["type"], "tab_blur");
        assert!(json["meta"].as_object().unwrap().is_empty());
    }

    #[test]
    fn event_meta_roundtrip() {
        let event = ProctorEvent::new(SessionId::new("sess_1"), ProctorEventKind::TabFocus)
            .with_meta("source", Value::String("test".into()));
        let json = serde_json::to_string(&event).unwrap();
        let back: ProctorEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
