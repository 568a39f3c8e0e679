//! Gemini `generateContent` REST client and its wire schema.
//!
//! ## Why a typed schema?
//!
//! The response nests `candidates → content → parts → inlineData`, and every
//! level may be absent (safety blocks, text-only answers, empty candidates).
//! Modelling each level as an `Option`/defaulted `Vec` lets a missing level
//! read as "no payloads" instead of a parse failure, and keeps the traversal
//! in one place: [`GenerateContentResponse::inline_payloads`].
//!
//! Inline data arrives base64-encoded. It is decoded during deserialisation,
//! so a response with a corrupt payload is a malformed response as a whole.

use super::ContentGenerator;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, ProviderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const SERVICE: &str = "gemini";

// ── Request schema ───────────────────────────────────────────────────────

/// Body of `POST /models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// A single-turn text prompt with no generation config.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::user_text(prompt)],
            generation_config: None,
        }
    }

    /// A single-turn text prompt asking for the given output modalities.
    pub fn with_modalities(prompt: impl Into<String>, modalities: &[Modality]) -> Self {
        Self {
            contents: vec![Content::user_text(prompt)],
            generation_config: Some(GenerationConfig {
                response_modalities: modalities.to_vec(),
                speech_config: None,
            }),
        }
    }

    /// A speech request read by one of the prebuilt voices.
    pub fn speech(text: impl Into<String>, voice_name: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::user_text(text)],
            generation_config: Some(GenerationConfig {
                response_modalities: vec![Modality::Audio],
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice_name.into(),
                        },
                    },
                }),
            }),
        }
    }

    /// The text of the first part of the first content, if any.
    pub fn prompt_text(&self) -> Option<&str> {
        self.contents
            .first()
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
    }
}

/// Output kinds a model can be asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Text,
    Image,
    Audio,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<Modality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

// ── Shared content schema ────────────────────────────────────────────────

/// One turn of a conversation: a role plus ordered parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        }
    }
}

/// A piece of content: text, inline binary data, or (in responses) neither.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, alias = "inline_data", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: Some(mime_type.into()),
                data,
            }),
        }
    }
}

/// Binary payload embedded directly in a response part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, alias = "mime_type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Raw bytes; base64 on the wire.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

// ── Response schema ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Every inline-data part across all candidates and all parts, in
    /// response order.
    pub fn inline_payloads(&self) -> impl Iterator<Item = &InlineData> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.inline_data.as_ref())
    }

    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Inline data of the first part of the first candidate.
    ///
    /// Speech responses carry exactly one audio part; nothing else is
    /// inspected.
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .inline_data
            .as_ref()
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(d)?;
        STANDARD
            .decode(encoded.trim())
            .map_err(serde::de::Error::custom)
    }
}

// ── Client ───────────────────────────────────────────────────────────────

/// Thin reqwest wrapper around the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.gemini_base_url.clone(),
            api_key: config.gemini_api_key.clone(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ProviderError::Transport {
                service: SERVICE,
                source,
            })?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::MalformedResponse {
                service: SERVICE,
                detail: e.to_string(),
            })?;
        debug!(
            "{}: {} candidate(s), {} inline part(s)",
            model,
            parsed.candidates.len(),
            parsed.inline_payloads().count()
        );
        Ok(parsed)
    }
}
