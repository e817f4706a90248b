//! Head-pose estimation.
//!
//! Preferred path decomposes the rigid transform supplied by the engine;
//! when no transform is available a coarse landmark heuristic fills in.

use crate::detect::Landmark;
use crate::error::RelayError;

// Canonical landmark indices used by the fallback heuristic.
const LEFT_EYE_OUTER: usize = 33;
const RIGHT_EYE_OUTER: usize = 263;
const NOSE_TIP: usize = 1;

const SINGULAR_EPS: f64 = 1e-6;

/// Head orientation in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseAngles {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// Decompose the upper-left 3x3 rotation of a row-major homogeneous 4x4
/// into yaw/pitch/roll degrees (X-Y-Z Euler extraction).
pub fn from_transform(m: &[f64; 16]) -> PoseAngles {
    let (r00, r10) = (m[0], m[4]);
    let (r11, r12) = (m[5], m[6]);
    let (r20, r21, r22) = (m[8], m[9], m[10]);

    let sy = (r00 * r00 + r10 * r10).sqrt();
    if sy >= SINGULAR_EPS {
        PoseAngles {
            yaw: (-r20).atan2(sy).to_degrees(),
            pitch: r21.atan2(r22).to_degrees(),
            roll: r10.atan2(r00).to_degrees(),
        }
    } else {
        // Gimbal-locked: roll is unobservable, pin it to zero.
        PoseAngles {
            yaw: (-r20).atan2(sy).to_degrees(),
            pitch: (-r12).atan2(r11).to_degrees(),
            roll: 0.0,
        }
    }
}

/// Approximate the pose from eye-corner and nose-tip landmarks.
///
/// This is a coarse heuristic, not a rigid solve: it reads the tilt of the
/// eye-to-eye vector and the nose depth, which is good enough for relative
/// head motion but not physically rigorous.
pub fn from_landmarks(landmarks: &[Landmark]) -> Result<PoseAngles, RelayError> {
    let left = landmark_at(landmarks, LEFT_EYE_OUTER)?;
    let right = landmark_at(landmarks, RIGHT_EYE_OUTER)?;
    let nose = landmark_at(landmarks, NOSE_TIP)?;

    let vx = (right.x - left.x) as f64;
    let vy = (right.y - left.y) as f64;
    let vz = (right.z - left.z) as f64;

    Ok(PoseAngles {
        yaw: vz.atan2(vx).to_degrees(),
        pitch: (nose.z as f64).atan2(vy).to_degrees(),
        roll: vy.atan2(vx).to_degrees(),
    })
}

fn landmark_at(landmarks: &[Landmark], index: usize) -> Result<Landmark, RelayError> {
    landmarks.get(index).copied().ok_or_else(|| {
        RelayError::Engine(format!(
            "landmark index {} out of range ({} landmarks)",
            index,
            landmarks.len()
        ))
    })
}

#[cfg(test)]
#[path = "pose_test.rs"]
mod pose_test;
