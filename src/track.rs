//! Frame tracker: one in-flight detection per connection.
//!
//! `process` is the single suspension point of a connection. Each call
//! opens a fresh one-shot channel, submits the frame, and waits for the
//! completion or the deadline, whichever wins. The channel doubles as the
//! correlation token: a completion for a timed-out request lands on a
//! dropped receiver and disappears, so it can never be credited to a newer
//! frame. The echoed request id guards against a misbehaving engine
//! answering on the wrong channel.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::timeout;

use crate::detect::engine::{DetectRequest, LandmarkEngine};
use crate::detect::Detection;
use crate::error::RelayError;
use crate::media::RgbFrame;

/// Completion timestamps kept for the throughput estimate.
const FPS_HISTORY_LEN: usize = 30;

pub struct FrameTracker<E> {
    engine: E,
    deadline: Duration,
    next_request: u64,
    completed: VecDeque<i64>,
}

impl<E: LandmarkEngine> FrameTracker<E> {
    pub fn new(engine: E, deadline: Duration) -> Self {
        Self {
            engine,
            deadline,
            next_request: 0,
            completed: VecDeque::with_capacity(FPS_HISTORY_LEN + 1),
        }
    }

    /// Run one frame through the engine.
    ///
    /// Returns `None` when the engine does not answer within the deadline;
    /// the submitted work is not cancelled, its eventual completion is
    /// simply discarded. Engine faults (failed submission, dropped
    /// completion channel) surface as errors.
    pub async fn process(
        &mut self,
        frame: RgbFrame,
        timestamp_ms: i64,
    ) -> Result<Option<Detection>, RelayError> {
        let request_id = self.next_request;
        self.next_request += 1;

        let (done, wait) = oneshot::channel();
        self.engine.submit(
            DetectRequest {
                id: request_id,
                frame,
                timestamp_ms,
            },
            done,
        )?;

        match timeout(self.deadline, wait).await {
            Ok(Ok(completion)) => {
                if completion.request_id != request_id {
                    log::warn!(
                        "discarding stale completion {} while awaiting {}",
                        completion.request_id,
                        request_id
                    );
                    return Ok(None);
                }
                self.record_completion(completion.timestamp_ms);
                Ok(Some(completion.detection))
            }
            Ok(Err(_)) => Err(RelayError::Engine(format!(
                "engine '{}' dropped the completion channel",
                self.engine.name()
            ))),
            Err(_) => {
                log::debug!(
                    "detection request {} timed out after {:?}",
                    request_id,
                    self.deadline
                );
                Ok(None)
            }
        }
    }

    /// Rolling throughput estimate from completion timestamps.
    ///
    /// The timestamps come from the engine's clock domain and arrive in
    /// submission order, not necessarily monotonic; any non-positive span
    /// reads as zero throughput.
    pub fn fps(&self) -> f64 {
        if self.completed.len() < 2 {
            return 0.0;
        }
        let oldest = *self.completed.front().unwrap();
        let newest = *self.completed.back().unwrap();
        let dt_ms = newest - oldest;
        if dt_ms <= 0 {
            return 0.0;
        }
        (self.completed.len() - 1) as f64 / (dt_ms as f64 / 1000.0)
    }

    fn record_completion(&mut self, timestamp_ms: i64) {
        self.completed.push_back(timestamp_ms);
        if self.completed.len() > FPS_HISTORY_LEN {
            self.completed.pop_front();
        }
    }
}

#[cfg(test)]
#[path = "track_test.rs"]
mod track_test;
