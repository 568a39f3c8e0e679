//! Error types for the story-gateway library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`GatewayError`]: **Fatal** for one HTTP request. The story, the
//!   illustration set or the narration cannot be produced at all. Mapped to a
//!   generic `500` response by [`crate::server`].
//!
//! * [`FragmentError`]: **Non-fatal**. One sentence of the story (or one image
//!   payload inside it) failed to generate, decode or upload, but the other
//!   fragments are fine. The illustration pipeline logs it and moves on.
//!
//! * [`ProviderError`]: raised by the clients talking to the external
//!   services. Callers wrap it into one of the two types above depending on
//!   whether the failure is recoverable for them.
//!
//! Provider error text is kept in these values for the server log only.
//! [`GatewayError::public_detail`] is what reaches the caller.

use thiserror::Error;

/// All fatal errors returned by the gateway operations.
///
/// Per-fragment failures use [`FragmentError`] and are swallowed by the
/// illustration pipeline rather than propagated here.
#[derive(Debug, Error)]
pub enum GatewayError {
    // ── Illustration ──────────────────────────────────────────────────────
    /// Every fragment failed (or the story had none); output would be empty.
    #[error("No images could be generated for {fragments} story fragment(s)")]
    NoImagesGenerated { fragments: usize },

    // ── Story text ────────────────────────────────────────────────────────
    /// The text model call failed or returned no text.
    #[error("Story generation failed: {detail}")]
    StoryGenerationFailed { detail: String },

    // ── Narration ─────────────────────────────────────────────────────────
    /// The speech model call itself failed.
    #[error("Audio generation failed: {detail}")]
    AudioGenerationFailed { detail: String },

    /// The speech model answered but the audio could not be extracted or
    /// wrapped into a WAV container.
    #[error("Audio processing failed: {detail}")]
    AudioProcessingFailed { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// The message shown to HTTP callers. Never includes provider detail.
    pub fn public_detail(&self) -> &'static str {
        match self {
            GatewayError::NoImagesGenerated { .. } => "No images could be generated",
            GatewayError::StoryGenerationFailed { .. } => "Failed to generate story",
            GatewayError::AudioGenerationFailed { .. } => "Failed to generate audio",
            GatewayError::AudioProcessingFailed { .. } => "Failed to process audio",
            GatewayError::InvalidConfig(_) | GatewayError::Internal(_) => "Internal server error",
        }
    }
}

/// A non-fatal error for a single story fragment or image payload.
///
/// The overall illustration request continues unless ALL fragments fail.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FragmentError {
    /// The image-generation request for the fragment errored. The whole
    /// fragment is skipped.
    #[error("Fragment {index}: image generation request failed: {detail}")]
    GenerationRequestFailed { index: usize, detail: String },

    /// A returned payload is not a recognisable image, or re-encoding it
    /// to PNG failed. Only that payload is skipped.
    #[error("Fragment {index}: payload is not a decodable image: {detail}")]
    Decode { index: usize, detail: String },

    /// Uploading the transcoded image to the blob store failed.
    #[error("Fragment {index}: upload failed: {detail}")]
    Storage { index: usize, detail: String },
}

impl FragmentError {
    /// 0-based position of the fragment in the story.
    pub fn index(&self) -> usize {
        match self {
            FragmentError::GenerationRequestFailed { index, .. }
            | FragmentError::Decode { index, .. }
            | FragmentError::Storage { index, .. } => *index,
        }
    }
}

/// Failures reported by the external service clients.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network-level failure (DNS, TLS, connection reset, timeout).
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status.
    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The body could not be parsed into the expected schema.
    #[error("{service} returned a malformed response: {detail}")]
    MalformedResponse {
        service: &'static str,
        detail: String,
    },
}
