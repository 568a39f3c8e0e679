//! Image validation and transcoding: arbitrary raster bytes → PNG.
//!
//! ## Why re-encode?
//!
//! The image model may answer in PNG, JPEG or WebP depending on the model
//! revision, and occasionally with bytes that are not an image at all.
//! Decoding proves the payload is a real image; re-encoding gives the blob
//! store a single canonical format to serve.
//!
//! ## Why spawn_blocking?
//!
//! Decoding and PNG compression are CPU-bound. Running them on a Tokio
//! worker would stall every other request sharing that thread, so the work
//! is moved onto the blocking pool.

use super::request::ImagePayload;
use crate::error::FragmentError;
use image::ImageFormat;
use std::io::Cursor;
use tracing::debug;

/// Decode `bytes` with format auto-detection and re-encode as PNG.
pub fn to_png(bytes: &[u8]) -> Result<Vec<u8>, image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    debug!(
        "Transcoded {}x{} image: {} → {} bytes",
        img.width(),
        img.height(),
        bytes.len(),
        buf.len()
    );
    Ok(buf)
}

/// Validate and transcode one payload of fragment `index`.
///
/// Any decode or encode failure is reported as [`FragmentError::Decode`];
/// the caller drops the payload.
pub async fn transcode(index: usize, payload: ImagePayload) -> Result<Vec<u8>, FragmentError> {
    debug!(
        "Fragment {}: transcoding {} byte(s) declared as {}",
        index,
        payload.bytes.len(),
        payload.mime_type.as_deref().unwrap_or("<no mime type>")
    );
    let result = tokio::task::spawn_blocking(move || to_png(&payload.bytes))
        .await
        .map_err(|e| FragmentError::Decode {
            index,
            detail: format!("transcode task panicked: {e}"),
        })?;

    result.map_err(|e| FragmentError::Decode {
        index,
        detail: e.to_string(),
    })
}
