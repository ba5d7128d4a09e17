use std::sync::Arc;
use std::time::Duration;

use api::{InMemoryApi, SessionApi};
use interview_core::model::{ProctorEventKind, SessionKind, VisibilitySignal};
use services::{ProctorConfig, ProctorEmitter, StubCamera};
use tokio::sync::mpsc;

fn visibility_kinds(backend: &InMemoryApi, session_id: &interview_core::model::SessionId) -> Vec<ProctorEventKind> {
    backend
        .recorded_events(session_id)
        .into_iter()
        .map(|e| e.kind)
        .filter(|k| matches!(k, ProctorEventKind::TabBlur | ProctorEventKind::TabFocus))
        .collect()
}

fn webcam_kinds(backend: &InMemoryApi, session_id: &interview_core::model::SessionId) -> Vec<ProctorEventKind> {
    backend
        .recorded_events(session_id)
        .into_iter()
        .map(|e| e.kind)
        .filter(|k| matches!(k, ProctorEventKind::WebcamOn | ProctorEventKind::WebcamOff))
        .collect()
}

#[tokio::test]
async fn toggles_emit_alternating_events_in_order() {
    let backend = Arc::new(InMemoryApi::new());
    let session_id = backend.create_session(SessionKind::Tech).await.unwrap();

    let emitter = ProctorEmitter::new(backend.clone());
    let (tx, rx) = mpsc::channel(8);
    let handle = emitter.start(session_id.clone(), rx, Arc::new(StubCamera::granted()));

    for signal in [
        VisibilitySignal::Hidden,
        VisibilitySignal::Visible,
        VisibilitySignal::Hidden,
        VisibilitySignal::Visible,
    ] {
        tx.send(signal).await.unwrap();
    }
    drop(tx);
    handle.join().await;

    assert_eq!(
        visibility_kinds(&backend, &session_id),
        vec![
            ProctorEventKind::TabBlur,
            ProctorEventKind::TabFocus,
            ProctorEventKind::TabBlur,
            ProctorEventKind::TabFocus,
        ]
    );
}

#[tokio::test]
async fn probe_emits_exactly_one_consent_signal() {
    let backend = Arc::new(InMemoryApi::new());
    let granted_session = backend.create_session(SessionKind::Tech).await.unwrap();
    let denied_session = backend.create_session(SessionKind::Tech).await.unwrap();

    let emitter = ProctorEmitter::new(backend.clone());

    let (tx, rx) = mpsc::channel(1);
    let handle = emitter.start(granted_session.clone(), rx, Arc::new(StubCamera::granted()));
    drop(tx);
    handle.join().await;
    assert_eq!(
        webcam_kinds(&backend, &granted_session),
        vec![ProctorEventKind::WebcamOn]
    );

    let (tx, rx) = mpsc::channel(1);
    let handle = emitter.start(denied_session.clone(), rx, Arc::new(StubCamera::denied()));
    drop(tx);
    handle.join().await;
    assert_eq!(
        webcam_kinds(&backend, &denied_session),
        vec![ProctorEventKind::WebcamOff]
    );
}

#[tokio::test]
async fn cancel_stops_visibility_but_not_the_probe() {
    let backend = Arc::new(InMemoryApi::new());
    let session_id = backend.create_session(SessionKind::Tech).await.unwrap();

    let emitter = ProctorEmitter::new(backend.clone());
    let (tx, rx) = mpsc::channel(8);
    let handle = emitter.start(session_id.clone(), rx, Arc::new(StubCamera::granted()));

    handle.cancel();
    // The listener is gone once the receiver is dropped by the aborted task.
    tx.closed().await;
    assert!(tx.send(VisibilitySignal::Hidden).await.is_err());

    // The already-issued probe still completes and reports its outcome.
    handle.join().await;
    assert!(visibility_kinds(&backend, &session_id).is_empty());
    assert_eq!(
        webcam_kinds(&backend, &session_id),
        vec![ProctorEventKind::WebcamOn]
    );
}

#[tokio::test]
async fn failed_sends_are_dropped_without_stopping_anything() {
    let backend = Arc::new(InMemoryApi::new());
    let session_id = backend.create_session(SessionKind::Tech).await.unwrap();
    backend.fail_proctor_sends(true);

    let emitter = ProctorEmitter::new(backend.clone());
    let (tx, rx) = mpsc::channel(8);
    let handle = emitter.start(session_id.clone(), rx, Arc::new(StubCamera::granted()));
    tx.send(VisibilitySignal::Hidden).await.unwrap();
    tx.send(VisibilitySignal::Visible).await.unwrap();
    drop(tx);
    handle.join().await;

    // Everything was dropped silently; nothing errored, nothing recorded.
    assert!(backend.recorded_events(&session_id).is_empty());

    // A fresh start emits normally once the sink recovers.
    backend.fail_proctor_sends(false);
    let (tx, rx) = mpsc::channel(8);
    let handle = emitter.start(session_id.clone(), rx, Arc::new(StubCamera::granted()));
    tx.send(VisibilitySignal::Hidden).await.unwrap();
    drop(tx);
    handle.join().await;
    assert_eq!(
        visibility_kinds(&backend, &session_id),
        vec![ProctorEventKind::TabBlur]
    );
}

#[tokio::test]
async fn bounded_retry_redelivers_after_transient_failure() {
    let backend = Arc::new(InMemoryApi::new());
    let session_id = backend.create_session(SessionKind::Tech).await.unwrap();
    backend.fail_proctor_sends(true);

    let emitter = ProctorEmitter::new(backend.clone()).with_config(ProctorConfig {
        retry_attempts: 5,
        retry_backoff: Duration::from_millis(50),
    });
    let (tx, rx) = mpsc::channel(8);
    let handle = emitter.start(session_id.clone(), rx, Arc::new(StubCamera::denied()));
    tx.send(VisibilitySignal::Hidden).await.unwrap();
    backend.fail_proctor_sends(false);
    drop(tx);
    handle.join().await;

    assert_eq!(
        visibility_kinds(&backend, &session_id),
        vec![ProctorEventKind::TabBlur]
    );
}
