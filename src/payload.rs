//! Outbound payload construction.
//!
//! The wire schema is fixed at compile time: every field below serializes on
//! every message, absent detections included.

use serde::Serialize;

use crate::detect::{Blendshape, Detection, Face};
use crate::error::RelayError;
use crate::pose::{self, PoseAngles};
use crate::protocol::{now_ms, FrameHeader};

#[derive(Debug, Clone, Serialize)]
pub struct TrackPayload {
    pub ts: i64,
    pub present: bool,
    pub pose: PoseState,
    pub eye: EyeState,
    pub mouth: MouthState,
    pub brow: BrowState,
    pub debug: DebugState,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseState {
    pub yaw_deg: f64,
    pub pitch_deg: f64,
    pub roll_deg: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EyeState {
    pub left_open: f64,
    pub right_open: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MouthState {
    pub open: f64,
    pub smile: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowState {
    pub left_up: f64,
    pub right_up: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugState {
    pub server_fps: f64,
    pub latency_ms: i64,
}

/// Inline error reply for an engine fault; the connection stays up.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub error: String,
}

impl TrackPayload {
    /// Baseline payload for a frame with no detected subject: neutral face,
    /// eyes fully open, zero debug stats.
    pub fn empty(ts_ms: i64) -> Self {
        Self {
            ts: ts_ms,
            present: false,
            pose: PoseState {
                yaw_deg: 0.0,
                pitch_deg: 0.0,
                roll_deg: 0.0,
            },
            eye: EyeState {
                left_open: 1.0,
                right_open: 1.0,
            },
            mouth: MouthState {
                open: 0.0,
                smile: 0.0,
            },
            brow: BrowState {
                left_up: 0.0,
                right_up: 0.0,
            },
            debug: DebugState {
                server_fps: 0.0,
                latency_ms: 0,
            },
        }
    }
}

/// Build the outbound payload for one processed frame.
///
/// `result` is `None` when detection timed out; a present result may still
/// carry no face. Either way the payload ships with the current throughput
/// estimate attached.
pub fn assemble(
    result: Option<&Detection>,
    header: &FrameHeader,
    server_fps: f64,
) -> Result<TrackPayload, RelayError> {
    let ts_ms = header.timestamp_ms();
    let mut payload = TrackPayload::empty(ts_ms);
    payload.debug.server_fps = server_fps;

    let Some(face) = result.and_then(|r| r.face.as_ref()) else {
        return Ok(payload);
    };

    payload.present = true;

    let shapes = &face.blendshapes;
    payload.eye.left_open = (1.0 - blendshape_score(shapes, "eyeBlinkLeft")).max(0.0);
    payload.eye.right_open = (1.0 - blendshape_score(shapes, "eyeBlinkRight")).max(0.0);
    payload.mouth.open = blendshape_score(shapes, "jawOpen").min(1.0);
    payload.mouth.smile = (blendshape_score(shapes, "mouthSmileLeft")
        + blendshape_score(shapes, "mouthSmileRight"))
        / 2.0;
    let inner_up = blendshape_score(shapes, "browInnerUp");
    payload.brow.left_up = inner_up.max(blendshape_score(shapes, "browOuterUpLeft"));
    payload.brow.right_up = inner_up.max(blendshape_score(shapes, "browOuterUpRight"));

    let PoseAngles { yaw, pitch, roll } = face_pose(face)?;
    payload.pose = PoseState {
        yaw_deg: yaw,
        pitch_deg: pitch,
        roll_deg: roll,
    };

    if header.ts.is_some() {
        payload.debug.latency_ms = (now_ms() - ts_ms).max(0);
    }

    Ok(payload)
}

fn face_pose(face: &Face) -> Result<PoseAngles, RelayError> {
    match &face.transform {
        Some(m) => Ok(pose::from_transform(m)),
        None => pose::from_landmarks(&face.landmarks),
    }
}

/// Score for a named blendshape category; unknown names read as 0.
fn blendshape_score(shapes: &[Blendshape], name: &str) -> f64 {
    shapes
        .iter()
        .find(|s| s.name == name)
        .map(|s| s.score as f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
#[path = "payload_test.rs"]
mod payload_test;
