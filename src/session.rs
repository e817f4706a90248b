//! Per-connection frame pipeline: demultiplex → decode → track → assemble.
//!
//! One session owns one tracker (and through it one engine instance), so
//! nothing detection-related is shared between connections.

use std::time::Duration;

use crate::detect::engine::LandmarkEngine;
use crate::error::RelayError;
use crate::media::decode;
use crate::payload::{self, TrackPayload};
use crate::protocol::{self, now_ms};
use crate::track::FrameTracker;

pub struct TrackSession<E> {
    tracker: FrameTracker<E>,
}

impl<E: LandmarkEngine> TrackSession<E> {
    pub fn new(engine: E, deadline: Duration) -> Self {
        Self {
            tracker: FrameTracker::new(engine, deadline),
        }
    }

    /// Handle one binary frame message, producing exactly one payload.
    ///
    /// Malformed messages and undecodable images degrade to an absent
    /// payload; a returned error is an engine fault the caller reports
    /// inline without closing the connection.
    pub async fn handle_frame(&mut self, raw: &[u8]) -> Result<TrackPayload, RelayError> {
        let (header, image) = match protocol::split_frame(raw) {
            Ok(parts) => parts,
            Err(e) => {
                log::debug!("dropping malformed message: {}", e);
                return Ok(TrackPayload::empty(now_ms()));
            }
        };

        let ts_ms = header.timestamp_ms();
        let Some(frame) = decode::decode_frame(image) else {
            log::debug!("undecodable image payload ({} bytes)", image.len());
            return Ok(TrackPayload::empty(ts_ms));
        };

        let result = self.tracker.process(frame, ts_ms).await?;
        payload::assemble(result.as_ref(), &header, self.tracker.fps())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
