use std::time::Duration;

use litsearch_logging::{lit_debug, lit_trace};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::EngineEvent;

/// Owned handle to a running poll timer.
///
/// Emits `EngineEvent::PollTick` once per interval, first one full interval
/// after start. Dropping the handle cancels the timer, so releasing it on
/// every exit path only requires letting it go out of scope.
#[derive(Debug)]
pub struct PollTimer {
    token: CancellationToken,
    interval: Duration,
}

impl PollTimer {
    /// Spawns the ticking task on the current tokio runtime.
    pub fn start(interval: Duration, events: mpsc::UnboundedSender<EngineEvent>) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        let token = CancellationToken::new();
        let cancelled = token.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        lit_trace!("Poll timer tick");
                        if events.send(EngineEvent::PollTick).is_err() {
                            break;
                        }
                    }
                }
            }
            lit_debug!("Poll timer task exited");
        });

        lit_debug!("Poll timer started interval_ms={}", interval.as_millis());
        Self { token, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Idempotent.
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            lit_debug!("Poll timer cancelled");
            self.token.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
