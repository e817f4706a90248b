//! Wire format for inbound camera frames.
//!
//! A frame message is `u32_le(header_len) || header_json || image_bytes`.
//! The header is a small JSON object; unknown fields are ignored so clients
//! can attach extra metadata without breaking older servers.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Deserialize;

use crate::error::RelayError;

/// Parsed frame metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameHeader {
    /// Client-supplied capture time, milliseconds since the Unix epoch.
    pub ts: Option<i64>,
}

impl FrameHeader {
    /// Capture timestamp, falling back to the server clock when the client
    /// did not send one.
    pub fn timestamp_ms(&self) -> i64 {
        self.ts.unwrap_or_else(now_ms)
    }
}

/// Split a binary frame message into its header and image payload.
///
/// Fails with [`RelayError::Malformed`] when the buffer is shorter than the
/// length prefix, the declared header length runs past the end of the
/// buffer, or the header bytes are not valid UTF-8 JSON.
pub fn split_frame(raw: &[u8]) -> Result<(FrameHeader, &[u8]), RelayError> {
    if raw.len() < 4 {
        return Err(RelayError::Malformed(format!(
            "buffer too short for length prefix ({} bytes)",
            raw.len()
        )));
    }
    let header_len = u32::from_le_bytes(raw[0..4].try_into().unwrap()) as usize;
    let rest = &raw[4..];
    if header_len > rest.len() {
        return Err(RelayError::Malformed(format!(
            "header length {} exceeds remaining {} bytes",
            header_len,
            rest.len()
        )));
    }
    let header: FrameHeader = serde_json::from_slice(&rest[..header_len])
        .map_err(|e| RelayError::Malformed(format!("header is not valid JSON: {}", e)))?;
    Ok((header, &rest[header_len..]))
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "protocol_test.rs"]
mod protocol_test;
