//! Face-landmark detection boundary.
//!
//! The engine itself is an external collaborator; this module owns the
//! result types, the asynchronous submission contract, and engine selection.

pub mod engine;
pub mod model;
pub mod stub;

use anyhow::{anyhow, Result};

use crate::config::RelayConfig;
use self::engine::LandmarkEngine;

/// Normalized 3D landmark in image space.
#[derive(Debug, Clone, Copy, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Named facial-expression intensity score.
#[derive(Debug, Clone)]
pub struct Blendshape {
    pub name: String,
    pub score: f32,
}

impl Blendshape {
    #[allow(dead_code)]
    pub fn new(name: impl Into<String>, score: f32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Single detected face: ordered landmarks, blendshape scores, and an
/// optional rigid transform (row-major homogeneous 4x4, upper-left 3x3 is
/// the rotation).
#[derive(Debug, Clone, Default)]
pub struct Face {
    pub landmarks: Vec<Landmark>,
    pub blendshapes: Vec<Blendshape>,
    pub transform: Option<[f64; 16]>,
}

/// One frame's detection output. `face` is `None` when the engine ran but
/// found no subject (single-subject mode: zero or one face).
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub face: Option<Face>,
}

impl Detection {
    pub fn no_face() -> Self {
        Self { face: None }
    }

    #[allow(dead_code)]
    pub fn with_face(face: Face) -> Self {
        Self { face: Some(face) }
    }
}

/// Construct the engine named in the config.
///
/// Each connection gets its own instance so correlation state never crosses
/// connections.
pub fn build_engine(config: &RelayConfig) -> Result<Box<dyn LandmarkEngine>> {
    match config.engine() {
        "stub" => Ok(Box::new(stub::StubEngine::no_face())),
        other => Err(anyhow!("unknown landmark engine '{}'", other)),
    }
}
