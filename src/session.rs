//! Analysis session state machine.
//!
//! One session drives at most one request at a time through
//! `Idle -> InFlight -> Succeeded | Failed`, and back to `InFlight` on the next submit.
//! The state can be driven in one call (`submit`) or split across threads
//! (`begin` on the UI side, `resolve` once the controller reports back).

use crate::engine::AnalysisTransport;
use crate::error::AnalyzeError;
use crate::input::InputController;
use crate::model::{AnalysisRequest, AnalysisResult};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    InFlight,
    Succeeded(AnalysisResult),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    state: SessionState,
    // Last successful result, kept on screen while a newer attempt is pending or failed.
    previous: Option<AnalysisResult>,
    request: Option<AnalysisRequest>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, SessionState::InFlight)
    }

    /// Request of the current or most recent attempt.
    pub fn last_request(&self) -> Option<&AnalysisRequest> {
        self.request.as_ref()
    }

    /// The most recently resolved successful result, if any.
    pub fn displayed_result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            SessionState::Succeeded(r) => Some(r),
            _ => self.previous.as_ref(),
        }
    }

    /// Error of the attempt that just resolved. Cleared as soon as a new attempt begins.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Start an attempt if the input allows it.
    ///
    /// Returns the request to dispatch and moves to `InFlight`, or `None` with no
    /// state change when the query is blank or an attempt is already running.
    pub fn begin(&mut self, input: &InputController) -> Option<AnalysisRequest> {
        if !input.can_submit(&self.state) {
            if self.is_in_flight() {
                warn!("submit ignored: an analysis is already in flight");
            } else {
                debug!("submit ignored: query is empty");
            }
            return None;
        }
        let request = AnalysisRequest::new(input.query(), input.user_context())?;

        if let SessionState::Succeeded(r) =
            std::mem::replace(&mut self.state, SessionState::InFlight)
        {
            self.previous = Some(r);
        }
        debug!(query = %request.query, "analysis in flight");
        self.request = Some(request.clone());
        Some(request)
    }

    /// Apply the outcome of the in-flight attempt.
    pub fn resolve(&mut self, outcome: Result<AnalysisResult, AnalyzeError>) -> &SessionState {
        if !self.is_in_flight() {
            warn!("outcome ignored: no analysis in flight");
            return &self.state;
        }
        self.state = match outcome {
            Ok(result) => {
                info!(profile_url = %result.profile_url, "analysis succeeded");
                self.previous = None;
                SessionState::Succeeded(result)
            }
            Err(e) => {
                match &e {
                    AnalyzeError::Service { status } => {
                        warn!(status, "analysis service returned an error status")
                    }
                    other => warn!(error = %other, "analysis failed"),
                }
                SessionState::Failed(e.to_string())
            }
        };
        &self.state
    }

    /// Run one full attempt: begin, await the transport, resolve.
    ///
    /// Returns `None` when the submit was rejected and nothing was dispatched.
    pub async fn submit<T>(
        &mut self,
        transport: &T,
        input: &InputController,
    ) -> Option<&SessionState>
    where
        T: AnalysisTransport + ?Sized,
    {
        let request = self.begin(input)?;
        let outcome = transport.analyze(&request).await;
        Some(self.resolve(outcome))
    }
}
