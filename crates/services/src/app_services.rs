use std::sync::Arc;

use api::{Api, ApiConfig};
use interview_core::Clock;

use crate::analyze::AnalyzeService;
use crate::auth::AuthService;
use crate::feedback::FeedbackAggregator;
use crate::proctor::{ProctorConfig, ProctorEmitter};
use crate::question_flow::QuestionFlowController;
use crate::session_client::SessionClient;
use crate::submission::SubmissionPipeline;

/// Assembles app-facing services over one shared backend handle.
///
/// Stateful components (`SessionClient`, `QuestionFlowController`) are
/// constructed fresh per view; the rest are cheap wrappers around the shared
/// capability handles.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    api: Api,
    proctor_config: ProctorConfig,
}

impl AppServices {
    #[must_use]
    pub fn new(clock: Clock, api: Api) -> Self {
        Self {
            clock,
            api,
            proctor_config: ProctorConfig::default(),
        }
    }

    /// Services wired to the HTTP backend configured via environment.
    #[must_use]
    pub fn from_env(clock: Clock) -> Self {
        Self::new(clock, Api::http(ApiConfig::from_env()))
    }

    #[must_use]
    pub fn with_proctor_config(mut self, config: ProctorConfig) -> Self {
        self.proctor_config = config;
        self
    }

    #[must_use]
    pub fn session_client(&self) -> SessionClient {
        SessionClient::new(self.clock, Arc::clone(&self.api.sessions))
    }

    #[must_use]
    pub fn proctor_emitter(&self) -> ProctorEmitter {
        ProctorEmitter::new(Arc::clone(&self.api.proctor)).with_config(self.proctor_config)
    }

    #[must_use]
    pub fn question_flow(&self) -> QuestionFlowController {
        QuestionFlowController::new(Arc::clone(&self.api.mcq))
    }

    #[must_use]
    pub fn submission_pipeline(&self) -> SubmissionPipeline {
        SubmissionPipeline::new(Arc::clone(&self.api.hr), Arc::clone(&self.api.code))
    }

    #[must_use]
    pub fn feedback_aggregator(&self) -> FeedbackAggregator {
        FeedbackAggregator::new(Arc::clone(&self.api.feedback), Arc::clone(&self.api.proctor))
    }

    #[must_use]
    pub fn auth(&self) -> AuthService {
        AuthService::new(Arc::clone(&self.api.auth))
    }

    #[must_use]
    pub fn analyze(&self) -> AnalyzeService {
        AnalyzeService::new(Arc::clone(&self.api.matching))
    }
}
