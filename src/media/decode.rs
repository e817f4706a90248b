//! Image decode boundary.
//!
//! Clients are expected to send JPEG, so a dedicated JPEG decoder runs
//! first. Anything it rejects gets one more chance through the
//! format-sniffing loader. Failures never cross this boundary; the caller
//! sees `None` and treats the message as carrying no usable frame.

use std::io::Cursor;

use image::codecs::jpeg::JpegDecoder;
use image::DynamicImage;

use crate::media::RgbFrame;

/// Decode a compressed image into an RGB frame, or `None` when both codec
/// paths fail.
pub fn decode_frame(bytes: &[u8]) -> Option<RgbFrame> {
    match decode_jpeg(bytes) {
        Some(frame) => Some(frame),
        None => decode_any(bytes),
    }
}

fn decode_jpeg(bytes: &[u8]) -> Option<RgbFrame> {
    let decoder = JpegDecoder::new(Cursor::new(bytes)).ok()?;
    let img = DynamicImage::from_decoder(decoder).ok()?;
    Some(to_rgb_frame(img))
}

fn decode_any(bytes: &[u8]) -> Option<RgbFrame> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| log::debug!("fallback decode failed: {}", e))
        .ok()?;
    Some(to_rgb_frame(img))
}

fn to_rgb_frame(img: DynamicImage) -> RgbFrame {
    let rgb = img.into_rgb8();
    let (width, height) = rgb.dimensions();
    RgbFrame::new(width, height, rgb.into_raw())
}

#[cfg(test)]
#[path = "decode_test.rs"]
mod decode_test;
