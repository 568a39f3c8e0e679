//! External service seams.
//!
//! The pipeline only ever talks to the two traits defined here. Production
//! code plugs in [`gemini::GeminiClient`] and [`cloudinary::CloudinaryStore`];
//! tests plug in in-memory fakes. Both traits are object-safe so the gateway
//! can hold them as `Arc<dyn …>` built once at start-up.

pub mod cloudinary;
pub mod gemini;

use crate::error::ProviderError;
use async_trait::async_trait;
use gemini::{GenerateContentRequest, GenerateContentResponse};

/// A model endpoint that answers Gemini-shaped `generateContent` requests.
///
/// Text, image and speech generation all go through this one call; the
/// request's response modalities select what comes back.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError>;
}

/// Object storage that accepts an image and hands back a public URL.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload a PNG into `folder` and return its secure URL.
    async fn upload(&self, png: Vec<u8>, folder: &str) -> Result<String, ProviderError>;
}
