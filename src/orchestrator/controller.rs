//! Analysis run controller.
//!
//! Owns dispatch of submitted requests and emits events for presentation layers.

use crate::engine::AnalysisTransport;
use crate::error::AnalyzeError;
use crate::model::{AnalysisRequest, AnalysisResult, SessionEvent};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Submit(AnalysisRequest),
    Quit,
}

type Attempt = JoinHandle<Result<AnalysisResult, AnalyzeError>>;

/// Spawn one analysis attempt.
fn start_attempt(
    transport: Arc<dyn AnalysisTransport>,
    request: AnalysisRequest,
    event_tx: &UnboundedSender<SessionEvent>,
) -> Attempt {
    let _ = event_tx.send(SessionEvent::Dispatched {
        query: request.query.clone(),
    });
    tokio::spawn(async move { transport.analyze(&request).await })
}

/// Dispatch submitted requests one at a time and report each outcome.
///
/// A submit that arrives while an attempt is running is dropped, so a session never
/// has two requests in flight. Quit ends the loop without waiting for the attempt.
pub(crate) async fn run_controller(
    transport: Arc<dyn AnalysisTransport>,
    event_tx: UnboundedSender<SessionEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let mut in_flight: Option<Attempt> = None;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::Submit(request)) => {
                        if in_flight.is_some() {
                            warn!(query = %request.query, "submit dropped: an analysis is already in flight");
                            continue;
                        }
                        debug!(query = %request.query, "starting analysis attempt");
                        in_flight = Some(start_attempt(transport.clone(), request, &event_tx));
                    }
                    Some(UiCommand::Quit) | None => {
                        if let Some(handle) = in_flight.take() {
                            handle.abort();
                        }
                        break Ok(());
                    }
                }
            }
            // Borrow the handle here and only take it once this branch has won.
            maybe_done = async {
                if let Some(h) = in_flight.as_mut() {
                    return Some(h.await);
                }
                futures::future::pending().await
            } => {
                if let Some(join_res) = maybe_done {
                    in_flight = None;
                    let outcome = match join_res {
                        Ok(outcome) => outcome,
                        Err(e) => Err(AnalyzeError::transport(format!(
                            "analysis task failed: {e}"
                        ))),
                    };
                    let _ = event_tx.send(SessionEvent::Resolved { outcome });
                }
            }
        }
    }
}
