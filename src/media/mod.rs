pub mod decode;

use bytes::Bytes;

/// Decoded camera frame, tightly packed RGB24.
#[derive(Debug, Clone)]
pub struct RgbFrame {
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

impl RgbFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data: Bytes::from(data),
        }
    }
}
