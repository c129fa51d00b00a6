use std::sync::Arc;
use std::time::Duration;

use litsearch_logging::{lit_debug, lit_info, lit_warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::backend::Backend;
use crate::timer::PollTimer;
use crate::{ApiError, ApiFailureKind, ChatResponse, EngineEvent, RequestId};

/// Runs backend requests as tasks on the current tokio runtime and reports
/// their outcomes as `EngineEvent`s, in completion order, on one channel.
///
/// Owns at most one `PollTimer`. Dropping the handle cancels the timer and
/// every outstanding request.
pub struct EngineHandle {
    backend: Arc<dyn Backend>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    shutdown: CancellationToken,
    timer: Option<PollTimer>,
}

impl EngineHandle {
    pub fn new(backend: Arc<dyn Backend>) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let handle = Self {
            backend,
            event_tx,
            shutdown: CancellationToken::new(),
            timer: None,
        };
        (handle, event_rx)
    }

    pub fn submit(&self, subject: impl Into<String>) {
        let subject = subject.into();
        let backend = self.backend.clone();
        let event_tx = self.event_tx.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {}
                result = backend.submit_build(&subject) => {
                    let _ = event_tx.send(EngineEvent::Submitted(result));
                }
            }
        });
    }

    pub fn poll(&self) {
        let backend = self.backend.clone();
        let event_tx = self.event_tx.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {}
                result = backend.fetch_status() => {
                    let _ = event_tx.send(EngineEvent::Status(result));
                }
            }
        });
    }

    /// Every call yields exactly one `EngineEvent::Answered`, even when the
    /// request task is cancelled or panics.
    pub fn ask(&self, request_id: RequestId, question: impl Into<String>) {
        let question = question.into();
        let backend = self.backend.clone();
        let shutdown = self.shutdown.clone();
        let reply = AnswerGuard::new(request_id, self.event_tx.clone());
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {}
                result = backend.ask(&question) => reply.settle(result),
            }
        });
    }

    /// Replaces any running timer, so at most one is ever active.
    pub fn start_polling(&mut self, interval: Duration) {
        if self.timer.take().is_some() {
            lit_debug!("Replacing running poll timer");
        }
        self.timer = Some(PollTimer::start(interval, self.event_tx.clone()));
    }

    pub fn stop_polling(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    pub fn is_polling(&self) -> bool {
        self.timer.is_some()
    }

    /// Logs whether the backend answers its root endpoint. Never reports an event.
    pub fn check_health(&self) {
        let backend = self.backend.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {}
                result = backend.health() => match result {
                    Ok(health) => lit_info!("Backend reachable: {}", health.message),
                    Err(err) => lit_warn!("Backend health check failed: {}", err),
                },
            }
        });
    }

    /// Cancels the timer and all outstanding requests.
    pub fn shutdown(&mut self) {
        self.stop_polling();
        self.shutdown.cancel();
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Reports `Cancelled` for its request if dropped before `settle`.
struct AnswerGuard {
    request_id: RequestId,
    event_tx: Option<mpsc::UnboundedSender<EngineEvent>>,
}

impl AnswerGuard {
    fn new(request_id: RequestId, event_tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self {
            request_id,
            event_tx: Some(event_tx),
        }
    }

    fn settle(mut self, result: Result<ChatResponse, ApiError>) {
        self.send(result);
    }

    fn send(&mut self, result: Result<ChatResponse, ApiError>) {
        if let Some(event_tx) = self.event_tx.take() {
            let _ = event_tx.send(EngineEvent::Answered {
                request_id: self.request_id,
                result,
            });
        }
    }
}

impl Drop for AnswerGuard {
    fn drop(&mut self) {
        if self.event_tx.is_some() {
            lit_debug!("Request {} abandoned before completion", self.request_id);
            self.send(Err(ApiError::new(
                ApiFailureKind::Cancelled,
                "request abandoned before completion",
            )));
        }
    }
}
