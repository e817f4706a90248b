//! Stub engine: completes every request inline without running a model.
//!
//! With an empty script it reports "no face" at the frame's own timestamp,
//! which keeps the wire format, fps tracking, and payload shape exercisable
//! without a model asset. Tests drive it with a script of replies and can
//! park requests to simulate a stalled or late engine.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::detect::engine::{Completion, CompletionSender, DetectRequest, LandmarkEngine};
use crate::detect::Detection;
use crate::error::RelayError;

/// Scripted reply for one submitted request.
#[allow(dead_code)]
#[derive(Debug)]
pub enum StubReply {
    /// Complete immediately with this detection at the given engine time.
    Finish {
        detection: Detection,
        completed_at: i64,
    },
    /// Hold the completion channel open without answering.
    Stall,
    /// Fail the submission itself.
    Reject,
}

#[derive(Default)]
struct StubState {
    script: VecDeque<StubReply>,
    parked: VecDeque<(u64, CompletionSender)>,
}

pub struct StubEngine {
    state: Arc<Mutex<StubState>>,
}

/// Test-side control over a [`StubEngine`] that has been moved into a
/// tracker: release parked (stalled) requests to simulate late callbacks.
#[allow(dead_code)]
#[derive(Clone)]
pub struct StubHandle {
    state: Arc<Mutex<StubState>>,
}

impl StubEngine {
    /// Engine that answers every request with "no face", echoing the frame
    /// timestamp as its completion time.
    pub fn no_face() -> Self {
        Self {
            state: Arc::new(Mutex::new(StubState::default())),
        }
    }

    /// Engine that replays the given script, then behaves like
    /// [`StubEngine::no_face`]. Used by tests to shape completions.
    #[allow(dead_code)]
    pub fn scripted(replies: impl IntoIterator<Item = StubReply>) -> (Self, StubHandle) {
        let state = Arc::new(Mutex::new(StubState {
            script: replies.into_iter().collect(),
            parked: VecDeque::new(),
        }));
        let handle = StubHandle {
            state: state.clone(),
        };
        (Self { state }, handle)
    }
}

impl LandmarkEngine for StubEngine {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn submit(&mut self, request: DetectRequest, done: CompletionSender) -> Result<(), RelayError> {
        log::trace!(
            "stub submit: request {} ({}x{}, {} bytes, at {})",
            request.id,
            request.frame.width,
            request.frame.height,
            request.frame.data.len(),
            request.timestamp_ms
        );
        let mut state = self.state.lock().expect("stub state lock");
        match state.script.pop_front() {
            Some(StubReply::Finish {
                detection,
                completed_at,
            }) => {
                let _ = done.send(Completion {
                    request_id: request.id,
                    detection,
                    timestamp_ms: completed_at,
                });
                Ok(())
            }
            Some(StubReply::Stall) => {
                state.parked.push_back((request.id, done));
                Ok(())
            }
            Some(StubReply::Reject) => Err(RelayError::Engine(
                "stub engine rejected submission".to_string(),
            )),
            None => {
                let _ = done.send(Completion {
                    request_id: request.id,
                    detection: Detection::no_face(),
                    timestamp_ms: request.timestamp_ms,
                });
                Ok(())
            }
        }
    }
}

#[allow(dead_code)]
impl StubHandle {
    /// Complete the oldest parked request with the given detection.
    ///
    /// Returns `true` when the completion was delivered, `false` when the
    /// waiter was already gone (timed out) or nothing was parked.
    pub fn complete_parked(&self, detection: Detection, timestamp_ms: i64) -> bool {
        let parked = {
            let mut state = self.state.lock().expect("stub state lock");
            state.parked.pop_front()
        };
        match parked {
            Some((request_id, done)) => done
                .send(Completion {
                    request_id,
                    detection,
                    timestamp_ms,
                })
                .is_ok(),
            None => false,
        }
    }

    /// Drop the oldest parked request without answering, closing its
    /// completion channel.
    pub fn drop_parked(&self) {
        let mut state = self.state.lock().expect("stub state lock");
        state.parked.pop_front();
    }

    /// Number of requests currently held without an answer.
    pub fn parked_len(&self) -> usize {
        self.state.lock().expect("stub state lock").parked.len()
    }
}
