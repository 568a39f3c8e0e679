//! Configuration types for the story gateway.
//!
//! All pipeline behaviour is controlled through [`GatewayConfig`], built via
//! its [`GatewayConfigBuilder`]. The config is constructed once at process
//! start and shared read-only by every request, so it is `Clone` and holds
//! no interior mutability.
//!
//! Credentials live in the same struct as the tuning knobs. The manual
//! `Debug` impl redacts them so the config can be logged at start-up.

use crate::error::GatewayError;
use std::fmt;

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Cloudinary upload endpoint.
pub const DEFAULT_CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

/// Configuration for the generation pipeline.
///
/// Built via [`GatewayConfig::builder()`].
///
/// # Example
/// ```rust
/// use story_gateway::GatewayConfig;
///
/// let config = GatewayConfig::builder()
///     .gemini_api_key("AIza...")
///     .cloudinary("demo", "1234", "secret")
///     .concurrency(2)
///     .build()
///     .unwrap();
/// assert_eq!(config.cloudinary.folder, "story_images");
/// ```
#[derive(Clone)]
pub struct GatewayConfig {
    /// Gemini API key, sent as `x-goog-api-key`.
    pub gemini_api_key: String,

    /// Base URL of the Gemini REST API. Overridable for tests and proxies.
    pub gemini_base_url: String,

    /// Model used for story text. Default: `gemini-2.5-flash`.
    pub text_model: String,

    /// Model used for per-sentence illustrations.
    /// Default: `gemini-2.0-flash-preview-image-generation`.
    pub image_model: String,

    /// Model used for narration. Default: `gemini-2.5-flash-preview-tts`.
    pub tts_model: String,

    /// Prebuilt voice for narration. Default: `Kore`.
    pub voice_name: String,

    /// Approximate story length requested from the text model. Default: 100.
    pub story_words: u32,

    /// Number of story fragments illustrated at once. Default: 4.
    ///
    /// Results are always returned in fragment order regardless of this
    /// value. Set to 1 to process fragments strictly one after another.
    pub concurrency: usize,

    /// Per-call timeout for every external request, in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Blob store settings.
    pub cloudinary: CloudinaryConfig,

    /// PCM layout of the speech model output.
    pub audio: AudioFormat,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.0-flash-preview-image-generation".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            voice_name: "Kore".to_string(),
            story_words: 100,
            concurrency: 4,
            api_timeout_secs: 60,
            cloudinary: CloudinaryConfig::default(),
            audio: AudioFormat::default(),
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("tts_model", &self.tts_model)
            .field("voice_name", &self.voice_name)
            .field("story_words", &self.story_words)
            .field("concurrency", &self.concurrency)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("cloudinary", &self.cloudinary)
            .field("audio", &self.audio)
            .finish()
    }
}

impl GatewayConfig {
    /// Create a new builder for `GatewayConfig`.
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GatewayConfig`].
#[derive(Debug)]
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl GatewayConfigBuilder {
    pub fn gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.gemini_api_key = key.into();
        self
    }

    pub fn gemini_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.gemini_base_url = trim_trailing_slash(url.into());
        self
    }

    pub fn text_model(mut self, model: impl Into<String>) -> Self {
        self.config.text_model = model.into();
        self
    }

    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.config.image_model = model.into();
        self
    }

    pub fn tts_model(mut self, model: impl Into<String>) -> Self {
        self.config.tts_model = model.into();
        self
    }

    pub fn voice_name(mut self, voice: impl Into<String>) -> Self {
        self.config.voice_name = voice.into();
        self
    }

    pub fn story_words(mut self, words: u32) -> Self {
        self.config.story_words = words.clamp(10, 2000);
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    /// Set the Cloudinary account credentials. Folder and endpoint keep
    /// their current values.
    pub fn cloudinary(
        mut self,
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        self.config.cloudinary.cloud_name = cloud_name.into();
        self.config.cloudinary.api_key = api_key.into();
        self.config.cloudinary.api_secret = api_secret.into();
        self
    }

    pub fn image_folder(mut self, folder: impl Into<String>) -> Self {
        self.config.cloudinary.folder = folder.into();
        self
    }

    pub fn cloudinary_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.cloudinary.base_url = trim_trailing_slash(url.into());
        self
    }

    pub fn signature_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.config.cloudinary.signature_algorithm = algorithm;
        self
    }

    pub fn audio(mut self, format: AudioFormat) -> Self {
        self.config.audio = format;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GatewayConfig, GatewayError> {
        let c = &self.config;
        if c.gemini_api_key.trim().is_empty() {
            return Err(GatewayError::InvalidConfig(
                "Gemini API key is required (GOOGLE_API_KEY)".into(),
            ));
        }
        let cl = &c.cloudinary;
        if cl.cloud_name.is_empty() || cl.api_key.is_empty() || cl.api_secret.is_empty() {
            return Err(GatewayError::InvalidConfig(
                "Cloudinary cloud name, API key and API secret are all required".into(),
            ));
        }
        if cl.folder.trim().is_empty() {
            return Err(GatewayError::InvalidConfig(
                "Image folder must not be empty".into(),
            ));
        }
        for (name, model) in [
            ("text", &c.text_model),
            ("image", &c.image_model),
            ("tts", &c.tts_model),
        ] {
            if model.trim().is_empty() {
                return Err(GatewayError::InvalidConfig(format!(
                    "The {name} model id must not be empty"
                )));
            }
        }
        c.audio.validate()?;
        Ok(self.config)
    }
}

// ── Sub-configs ──────────────────────────────────────────────────────────

/// Cloudinary account and upload destination.
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Logical folder every illustration is uploaded to. Default: `story_images`.
    pub folder: String,
    pub base_url: String,
    /// Digest used for upload signatures. Must match the account's
    /// signature setting. Default: SHA-1.
    pub signature_algorithm: SignatureAlgorithm,
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            folder: "story_images".to_string(),
            base_url: DEFAULT_CLOUDINARY_BASE_URL.to_string(),
            signature_algorithm: SignatureAlgorithm::default(),
        }
    }
}

impl fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .field("folder", &self.folder)
            .field("base_url", &self.base_url)
            .field("signature_algorithm", &self.signature_algorithm)
            .finish()
    }
}

/// Digest for Cloudinary upload signatures.
///
/// Cloudinary verifies with SHA-1 unless the account is switched to SHA-256.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl SignatureAlgorithm {
    /// Value of the `signature_algorithm` upload parameter, or `None` when
    /// the server default applies and the parameter is omitted.
    pub fn form_value(&self) -> Option<&'static str> {
        match self {
            SignatureAlgorithm::Sha1 => None,
            SignatureAlgorithm::Sha256 => Some("sha256"),
        }
    }
}

/// Layout of the raw PCM returned by the speech model.
///
/// Gemini TTS emits signed 16-bit little-endian mono at 24 kHz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: 24_000,
            channels: 1,
            bits_per_sample: 16,
        }
    }
}

impl AudioFormat {
    /// Bytes occupied by one frame (one sample for every channel).
    pub fn frame_bytes(&self) -> usize {
        self.channels as usize * (self.bits_per_sample as usize / 8)
    }

    fn validate(&self) -> Result<(), GatewayError> {
        if self.channels == 0 {
            return Err(GatewayError::InvalidConfig(
                "Audio must have at least one channel".into(),
            ));
        }
        if !matches!(self.bits_per_sample, 8 | 16 | 24 | 32) {
            return Err(GatewayError::InvalidConfig(format!(
                "Unsupported PCM sample width: {} bits",
                self.bits_per_sample
            )));
        }
        if self.sample_rate == 0 {
            return Err(GatewayError::InvalidConfig(
                "Sample rate must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> GatewayConfigBuilder {
        GatewayConfig::builder()
            .gemini_api_key("key")
            .cloudinary("cloud", "123", "shh")
    }

    #[test]
    fn defaults_match_reference_models() {
        let c = valid().build().expect("valid config");
        assert_eq!(c.text_model, "gemini-2.5-flash");
        assert_eq!(c.image_model, "gemini-2.0-flash-preview-image-generation");
        assert_eq!(c.tts_model, "gemini-2.5-flash-preview-tts");
        assert_eq!(c.voice_name, "Kore");
        assert_eq!(c.cloudinary.folder, "story_images");
        assert_eq!(c.audio, AudioFormat::default());
    }

    #[test]
    fn signature_defaults_to_sha1() {
        let c = valid().build().unwrap();
        assert_eq!(c.cloudinary.signature_algorithm, SignatureAlgorithm::Sha1);
        assert_eq!(c.cloudinary.signature_algorithm.form_value(), None);

        let c = valid()
            .signature_algorithm(SignatureAlgorithm::Sha256)
            .build()
            .unwrap();
        assert_eq!(c.cloudinary.signature_algorithm.form_value(), Some("sha256"));
    }

    #[test]
    fn missing_gemini_key_is_rejected() {
        let err = GatewayConfig::builder()
            .cloudinary("cloud", "123", "shh")
            .build()
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidConfig(_)));
    }

    #[test]
    fn missing_cloudinary_secret_is_rejected() {
        let err = GatewayConfig::builder()
            .gemini_api_key("key")
            .cloudinary("cloud", "123", "")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Cloudinary"));
    }

    #[test]
    fn concurrency_is_clamped_to_one() {
        let c = valid().concurrency(0).build().unwrap();
        assert_eq!(c.concurrency, 1);
    }

    #[test]
    fn base_urls_lose_trailing_slash() {
        let c = valid()
            .gemini_base_url("http://localhost:9000/")
            .cloudinary_base_url("http://localhost:9001//")
            .build()
            .unwrap();
        assert_eq!(c.gemini_base_url, "http://localhost:9000");
        assert_eq!(c.cloudinary.base_url, "http://localhost:9001");
    }

    #[test]
    fn bad_sample_width_is_rejected() {
        let err = valid()
            .audio(AudioFormat {
                bits_per_sample: 12,
                ..AudioFormat::default()
            })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("12 bits"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let c = valid().build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("shh"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn frame_bytes_for_default_format() {
        assert_eq!(AudioFormat::default().frame_bytes(), 2);
    }
}
