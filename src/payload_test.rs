use super::{assemble, TrackPayload};
use crate::detect::{Blendshape, Detection, Face, Landmark};
use crate::protocol::FrameHeader;

fn face_landmarks() -> Vec<Landmark> {
    let mut landmarks = vec![Landmark::default(); 478];
    landmarks[33] = Landmark {
        x: 0.3,
        y: 0.5,
        z: 0.0,
    };
    landmarks[263] = Landmark {
        x: 0.7,
        y: 0.5,
        z: 0.0,
    };
    landmarks[1] = Landmark {
        x: 0.5,
        y: 0.6,
        z: 0.0,
    };
    landmarks
}

fn detection_with_shapes(shapes: Vec<Blendshape>) -> Detection {
    Detection::with_face(Face {
        landmarks: face_landmarks(),
        blendshapes: shapes,
        transform: None,
    })
}

fn header(ts: Option<i64>) -> FrameHeader {
    FrameHeader { ts }
}

#[test]
fn test_empty_payload_defaults() {
    let payload = TrackPayload::empty(1000);

    assert_eq!(payload.ts, 1000);
    assert!(!payload.present);
    assert_eq!(payload.pose.yaw_deg, 0.0);
    assert_eq!(payload.pose.pitch_deg, 0.0);
    assert_eq!(payload.pose.roll_deg, 0.0);
    assert_eq!(payload.eye.left_open, 1.0);
    assert_eq!(payload.eye.right_open, 1.0);
    assert_eq!(payload.mouth.open, 0.0);
    assert_eq!(payload.mouth.smile, 0.0);
    assert_eq!(payload.brow.left_up, 0.0);
    assert_eq!(payload.brow.right_up, 0.0);
    assert_eq!(payload.debug.server_fps, 0.0);
    assert_eq!(payload.debug.latency_ms, 0);
}

#[test]
fn test_assemble_absent_result() {
    let payload = assemble(None, &header(Some(5000)), 12.5).unwrap();

    assert!(!payload.present);
    assert_eq!(payload.ts, 5000);
    assert_eq!(payload.eye.left_open, 1.0);
    assert_eq!(payload.eye.right_open, 1.0);
    assert_eq!(payload.mouth.open, 0.0);
    assert_eq!(payload.debug.server_fps, 12.5);
    assert_eq!(payload.debug.latency_ms, 0);
}

#[test]
fn test_assemble_result_without_face() {
    let payload = assemble(Some(&Detection::no_face()), &header(Some(5000)), 3.0).unwrap();

    assert!(!payload.present);
    assert_eq!(payload.debug.server_fps, 3.0);
}

#[test]
fn test_assemble_expression_scores() {
    let detection = detection_with_shapes(vec![
        Blendshape::new("eyeBlinkLeft", 0.2),
        Blendshape::new("eyeBlinkRight", 0.9),
        Blendshape::new("jawOpen", 0.6),
        Blendshape::new("mouthSmileLeft", 0.4),
        Blendshape::new("mouthSmileRight", 0.8),
        Blendshape::new("browInnerUp", 0.3),
        Blendshape::new("browOuterUpLeft", 0.1),
        Blendshape::new("browOuterUpRight", 0.7),
    ]);

    let payload = assemble(Some(&detection), &header(Some(1000)), 0.0).unwrap();

    assert!(payload.present);
    assert!((payload.eye.left_open - 0.8).abs() < 1e-6);
    assert!((payload.eye.right_open - 0.1).abs() < 1e-6);
    assert!((payload.mouth.open - 0.6).abs() < 1e-6);
    assert!((payload.mouth.smile - 0.6).abs() < 1e-6);
    assert!((payload.brow.left_up - 0.3).abs() < 1e-6);
    assert!((payload.brow.right_up - 0.7).abs() < 1e-6);
}

#[test]
fn test_assemble_missing_blendshapes_read_zero() {
    let detection = detection_with_shapes(vec![]);
    let payload = assemble(Some(&detection), &header(Some(1000)), 0.0).unwrap();

    assert!(payload.present);
    assert_eq!(payload.eye.left_open, 1.0);
    assert_eq!(payload.mouth.open, 0.0);
    assert_eq!(payload.mouth.smile, 0.0);
    assert_eq!(payload.brow.left_up, 0.0);
    assert_eq!(payload.brow.right_up, 0.0);
}

#[test]
fn test_assemble_clamps_out_of_range_scores() {
    let detection = detection_with_shapes(vec![
        Blendshape::new("eyeBlinkLeft", 1.4),
        Blendshape::new("jawOpen", 1.3),
    ]);

    let payload = assemble(Some(&detection), &header(Some(1000)), 0.0).unwrap();

    assert_eq!(payload.eye.left_open, 0.0);
    assert_eq!(payload.mouth.open, 1.0);
}

#[test]
fn test_assemble_prefers_transform_over_landmarks() {
    // Transform encodes a 30-degree roll; the landmarks alone would read a
    // level head.
    let (s, c) = 30f64.to_radians().sin_cos();
    let mut m = [0.0; 16];
    m[0] = c;
    m[1] = -s;
    m[4] = s;
    m[5] = c;
    m[10] = 1.0;
    m[15] = 1.0;

    let detection = Detection::with_face(Face {
        landmarks: face_landmarks(),
        blendshapes: vec![],
        transform: Some(m),
    });

    let payload = assemble(Some(&detection), &header(Some(1000)), 0.0).unwrap();
    assert!((payload.pose.roll_deg - 30.0).abs() < 1e-3);
    assert!(payload.pose.yaw_deg.abs() < 1e-3);
}

#[test]
fn test_assemble_landmark_fallback_pose() {
    let mut landmarks = face_landmarks();
    landmarks[263] = Landmark {
        x: 0.7,
        y: 0.6,
        z: 0.1,
    };
    let detection = Detection::with_face(Face {
        landmarks: landmarks.clone(),
        blendshapes: vec![],
        transform: None,
    });

    let payload = assemble(Some(&detection), &header(Some(1000)), 0.0).unwrap();

    let vx = (landmarks[263].x - landmarks[33].x) as f64;
    let vy = (landmarks[263].y - landmarks[33].y) as f64;
    let vz = (landmarks[263].z - landmarks[33].z) as f64;
    assert_eq!(payload.pose.yaw_deg, vz.atan2(vx).to_degrees());
    assert_eq!(payload.pose.roll_deg, vy.atan2(vx).to_degrees());
}

#[test]
fn test_assemble_latency_only_with_client_timestamp() {
    let detection = detection_with_shapes(vec![]);

    // Client timestamp in the past: latency is measured and non-negative.
    let with_ts = assemble(Some(&detection), &header(Some(1000)), 0.0).unwrap();
    assert!(with_ts.debug.latency_ms >= 0);

    // No client timestamp: latency stays zero.
    let without_ts = assemble(Some(&detection), &header(None), 0.0).unwrap();
    assert_eq!(without_ts.debug.latency_ms, 0);
}

#[test]
fn test_payload_json_schema() {
    let payload = TrackPayload::empty(77);
    let json = serde_json::to_value(&payload).unwrap();

    assert_eq!(json["ts"], 77);
    assert_eq!(json["present"], false);
    assert!(json["pose"].get("yawDeg").is_some());
    assert!(json["pose"].get("pitchDeg").is_some());
    assert!(json["pose"].get("rollDeg").is_some());
    assert!(json["eye"].get("leftOpen").is_some());
    assert!(json["eye"].get("rightOpen").is_some());
    assert!(json["mouth"].get("open").is_some());
    assert!(json["mouth"].get("smile").is_some());
    assert!(json["brow"].get("leftUp").is_some());
    assert!(json["brow"].get("rightUp").is_some());
    assert!(json["debug"].get("serverFps").is_some());
    assert!(json["debug"].get("latencyMs").is_some());
}
