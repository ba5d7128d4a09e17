use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use api::ProctorApi;
use interview_core::model::{ProctorEvent, ProctorEventKind, SessionId, VisibilitySignal};

//
// ─── CAMERA PROBE ──────────────────────────────────────────────────────────────
//

/// One-shot camera permission probe.
///
/// The emitter acquires once per `start`, emits the consent signal, and
/// releases on the same code path. No video or audio content is inspected;
/// this is a consent check, not monitoring.
#[async_trait]
pub trait CameraProbe: Send + Sync {
    /// Attempt to acquire the capture device.
    ///
    /// # Errors
    ///
    /// Returns `CameraDenied` when permission is refused or the device is
    /// unavailable.
    async fn acquire(&self) -> Result<Box<dyn CameraGrant>, CameraDenied>;
}

/// A live capture grant; releasing it frees the device.
pub trait CameraGrant: Send {
    fn release(self: Box<Self>);
}

/// Permission was refused or no device exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraDenied;

/// Probe with a canned outcome, for tests and front ends without a camera
/// path.
pub struct StubCamera {
    granted: bool,
}

impl StubCamera {
    #[must_use]
    pub fn granted() -> Self {
        Self { granted: true }
    }

    #[must_use]
    pub fn denied() -> Self {
        Self { granted: false }
    }
}

#[async_trait]
impl CameraProbe for StubCamera {
    async fn acquire(&self) -> Result<Box<dyn CameraGrant>, CameraDenied> {
        if self.granted {
            Ok(Box::new(StubGrant))
        } else {
            Err(CameraDenied)
        }
    }
}

struct StubGrant;

impl CameraGrant for StubGrant {
    fn release(self: Box<Self>) {}
}

//
// ─── EMITTER ───────────────────────────────────────────────────────────────────
//

/// Delivery policy for outbound proctor events.
///
/// The default is at-most-once: a failed send is dropped. Setting
/// `retry_attempts` above zero buys bounded redelivery at the cost of
/// possible duplicates; the backend reconciles ordering either way via its
/// own timestamps.
#[derive(Debug, Clone, Copy)]
pub struct ProctorConfig {
    pub retry_attempts: u32,
    pub retry_backoff: Duration,
}

impl Default for ProctorConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 0,
            retry_backoff: Duration::from_millis(250),
        }
    }
}

/// Translates platform signals into the session's proctor event stream.
///
/// Each `start` call registers its own independent listener: two un-cancelled
/// starts for one session mean two live forwarders. Emission never blocks the
/// caller and never surfaces delivery failures.
#[derive(Clone)]
pub struct ProctorEmitter {
    api: Arc<dyn ProctorApi>,
    config: ProctorConfig,
}

impl ProctorEmitter {
    #[must_use]
    pub fn new(api: Arc<dyn ProctorApi>) -> Self {
        Self {
            api,
            config: ProctorConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ProctorConfig) -> Self {
        self.config = config;
        self
    }

    /// Begin emitting for a session.
    ///
    /// Spawns a visibility forwarder consuming `signals` and issues the
    /// camera probe exactly once. The probe result lands regardless of later
    /// cancellation.
    #[must_use]
    pub fn start(
        &self,
        session_id: SessionId,
        signals: mpsc::Receiver<VisibilitySignal>,
        camera: Arc<dyn CameraProbe>,
    ) -> ProctorHandle {
        let visibility = tokio::spawn(forward_visibility(
            Arc::clone(&self.api),
            self.config,
            session_id.clone(),
            signals,
        ));
        let probe = tokio::spawn(run_probe(
            Arc::clone(&self.api),
            self.config,
            session_id,
            camera,
        ));
        ProctorHandle { visibility, probe }
    }
}

/// Cancellation handle returned by [`ProctorEmitter::start`].
pub struct ProctorHandle {
    visibility: JoinHandle<()>,
    probe: JoinHandle<()>,
}

impl ProctorHandle {
    /// Stop visibility forwarding.
    ///
    /// Does not and cannot retract the camera probe, which runs to
    /// completion and still reports exactly one outcome.
    pub fn cancel(&self) {
        self.visibility.abort();
    }

    /// Await orderly shutdown of both tasks. Call after `cancel`, or after
    /// dropping the signal sender to let the forwarder drain.
    pub async fn join(self) {
        let _ = self.probe.await;
        let _ = self.visibility.await;
    }
}

async fn forward_visibility(
    api: Arc<dyn ProctorApi>,
    config: ProctorConfig,
    session_id: SessionId,
    mut signals: mpsc::Receiver<VisibilitySignal>,
) {
    // Sequential dispatch: events leave in signal order, every transition is
    // reported, delivery stays best-effort.
    while let Some(signal) = signals.recv().await {
        let event = ProctorEvent::new(session_id.clone(), signal.event_kind());
        dispatch(api.as_ref(), config, event).await;
    }
}

async fn run_probe(
    api: Arc<dyn ProctorApi>,
    config: ProctorConfig,
    session_id: SessionId,
    camera: Arc<dyn CameraProbe>,
) {
    match camera.acquire().await {
        Ok(grant) => {
            let event = ProctorEvent::new(session_id, ProctorEventKind::WebcamOn);
            dispatch(api.as_ref(), config, event).await;
            grant.release();
        }
        Err(CameraDenied) => {
            let event = ProctorEvent::new(session_id, ProctorEventKind::WebcamOff);
            dispatch(api.as_ref(), config, event).await;
        }
    }
}

async fn dispatch(api: &dyn ProctorApi, config: ProctorConfig, event: ProctorEvent) {
    let mut attempt = 0;
    loop {
        match api.record_event(&event).await {
            Ok(()) => return,
            Err(err) if attempt < config.retry_attempts => {
                attempt += 1;
                warn!(kind = %event.kind, attempt, "proctor send failed, retrying: {err}");
                tokio::time::sleep(config.retry_backoff).await;
            }
            Err(err) => {
                // At-most-once contract: the integrity trail accepts gaps.
                debug!(kind = %event.kind, "proctor event dropped: {err}");
                return;
            }
        }
    }
}
