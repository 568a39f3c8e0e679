//! The three gateway operations: story text, illustrations, narration.
//!
//! [`StoryGateway`] owns the configuration and the provider handles and is
//! shared (behind an `Arc`) by every HTTP handler. It holds no per-request
//! state, so concurrent requests never interfere with each other.

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::illustrate::Illustrator;
use crate::output::IllustratedFragment;
use crate::pipeline::wav::pcm_to_wav;
use crate::prompts::story_prompt;
use crate::providers::cloudinary::CloudinaryStore;
use crate::providers::gemini::{GeminiClient, GenerateContentRequest};
use crate::providers::{BlobStore, ContentGenerator};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub struct StoryGateway {
    config: GatewayConfig,
    generator: Arc<dyn ContentGenerator>,
    illustrator: Illustrator,
}

impl std::fmt::Debug for StoryGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryGateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StoryGateway {
    /// Build a gateway wired to the real Gemini and Cloudinary services.
    pub fn from_config(config: GatewayConfig) -> Result<Self, GatewayError> {
        let generator = Arc::new(GeminiClient::new(&config)?);
        let store = Arc::new(CloudinaryStore::new(&config)?);
        Ok(Self::new(config, generator, store))
    }

    /// Build a gateway over arbitrary provider implementations.
    pub fn new(
        config: GatewayConfig,
        generator: Arc<dyn ContentGenerator>,
        store: Arc<dyn BlobStore>,
    ) -> Self {
        let illustrator = Illustrator::new(generator.clone(), store, &config);
        Self {
            config,
            generator,
            illustrator,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Write a short story about `prompt`.
    ///
    /// # Errors
    /// [`GatewayError::StoryGenerationFailed`] when the text model call
    /// fails or returns no text.
    pub async fn story(&self, prompt: &str) -> Result<String, GatewayError> {
        let start = Instant::now();
        let request = GenerateContentRequest::text(story_prompt(prompt, self.config.story_words));

        let response = self
            .generator
            .generate(&self.config.text_model, &request)
            .await
            .map_err(|e| GatewayError::StoryGenerationFailed {
                detail: e.to_string(),
            })?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(GatewayError::StoryGenerationFailed {
                detail: "model returned no text".to_string(),
            });
        }

        info!(
            "Story generated: {} chars in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }

    /// Illustrate every sentence of `story`. See [`crate::illustrate`].
    pub async fn illustrate(&self, story: &str) -> Result<Vec<IllustratedFragment>, GatewayError> {
        self.illustrator.generate_images(story).await
    }

    /// Read `text` aloud and return a complete WAV file.
    ///
    /// # Errors
    /// * [`GatewayError::AudioGenerationFailed`] when the speech call fails.
    /// * [`GatewayError::AudioProcessingFailed`] when the response carries no
    ///   audio or the PCM cannot be wrapped.
    pub async fn narrate(&self, text: &str) -> Result<Vec<u8>, GatewayError> {
        let start = Instant::now();
        let request = GenerateContentRequest::speech(text, self.config.voice_name.clone());

        let response = self
            .generator
            .generate(&self.config.tts_model, &request)
            .await
            .map_err(|e| GatewayError::AudioGenerationFailed {
                detail: e.to_string(),
            })?;

        let inline = response
            .first_inline_data()
            .ok_or_else(|| GatewayError::AudioProcessingFailed {
                detail: "response carried no inline audio".to_string(),
            })?;
        debug!(
            "Narration: {} PCM byte(s), mime {:?}",
            inline.data.len(),
            inline.mime_type
        );

        let wav = pcm_to_wav(&inline.data, self.config.audio).map_err(|e| {
            GatewayError::AudioProcessingFailed {
                detail: e.to_string(),
            }
        })?;

        info!(
            "Narration generated: {} bytes in {}ms",
            wav.len(),
            start.elapsed().as_millis()
        );
        Ok(wav)
    }
}
