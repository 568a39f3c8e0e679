//! Server binary for story-gateway.
//!
//! Maps flags and environment variables to `GatewayConfig` / `ServerConfig`
//! and runs the HTTP server until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use story_gateway::{serve, GatewayConfig, ServerConfig, SignatureAlgorithm, StoryGateway};
use tracing::info;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Credentials from the environment (or a .env file in the working dir)
  export GOOGLE_API_KEY=...
  export CLOUDINARY_CLOUD_NAME=demo CLOUDINARY_API_KEY=... CLOUDINARY_API_SECRET=...
  story-gateway

  # Serve the built frontend on the same port, local origins only
  story-gateway --static-dir frontend/dist --cors-origins http://localhost:5173

  # Sequential illustration, longer stories, verbose logs
  story-gateway --concurrency 1 --story-words 250 -v
"#;

/// Serve prompt → story, story → illustrations and text → narration over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "story-gateway",
    version,
    about = "HTTP gateway for illustrated, narrated short stories",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Interface to bind.
    #[arg(long, env = "STORY_GATEWAY_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind.
    #[arg(short, long, env = "STORY_GATEWAY_PORT", default_value_t = 8000)]
    port: u16,

    /// Directory served for every non-API path (the built frontend).
    #[arg(long, env = "STORY_GATEWAY_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Allowed CORS origins: `*` or a comma-separated list.
    #[arg(long, env = "STORY_GATEWAY_CORS_ORIGINS", default_value = "*")]
    cors_origins: String,

    /// Google Gemini API key.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    google_api_key: String,

    /// Cloudinary cloud name.
    #[arg(long, env = "CLOUDINARY_CLOUD_NAME")]
    cloudinary_cloud_name: String,

    /// Cloudinary API key.
    #[arg(long, env = "CLOUDINARY_API_KEY", hide_env_values = true)]
    cloudinary_api_key: String,

    /// Cloudinary API secret.
    #[arg(long, env = "CLOUDINARY_API_SECRET", hide_env_values = true)]
    cloudinary_api_secret: String,

    /// Cloudinary folder for uploaded illustrations.
    #[arg(long, env = "STORY_GATEWAY_IMAGE_FOLDER", default_value = "story_images")]
    image_folder: String,

    /// Upload signature digest; must match the Cloudinary account setting.
    #[arg(
        long,
        env = "CLOUDINARY_SIGNATURE_ALGORITHM",
        value_enum,
        default_value = "sha1"
    )]
    signature_algorithm: SignatureArg,

    /// Model for story text.
    #[arg(long, env = "STORY_GATEWAY_TEXT_MODEL")]
    text_model: Option<String>,

    /// Model for illustrations.
    #[arg(long, env = "STORY_GATEWAY_IMAGE_MODEL")]
    image_model: Option<String>,

    /// Model for narration.
    #[arg(long, env = "STORY_GATEWAY_TTS_MODEL")]
    tts_model: Option<String>,

    /// Prebuilt narration voice.
    #[arg(long, env = "STORY_GATEWAY_VOICE", default_value = "Kore")]
    voice: String,

    /// Approximate story length in words (10–2000).
    #[arg(long, env = "STORY_GATEWAY_STORY_WORDS", default_value_t = 100)]
    story_words: u32,

    /// Story fragments illustrated at once.
    #[arg(short, long, env = "STORY_GATEWAY_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Per-call timeout for external APIs, in seconds.
    #[arg(long, env = "STORY_GATEWAY_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "STORY_GATEWAY_VERBOSE")]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SignatureArg {
    Sha1,
    Sha256,
}

impl From<SignatureArg> for SignatureAlgorithm {
    fn from(v: SignatureArg) -> Self {
        match v {
            SignatureArg::Sha1 => SignatureAlgorithm::Sha1,
            SignatureArg::Sha256 => SignatureAlgorithm::Sha256,
        }
    }
}

impl Cli {
    fn gateway_config(&self) -> Result<GatewayConfig> {
        let mut builder = GatewayConfig::builder()
            .gemini_api_key(&self.google_api_key)
            .cloudinary(
                &self.cloudinary_cloud_name,
                &self.cloudinary_api_key,
                &self.cloudinary_api_secret,
            )
            .image_folder(&self.image_folder)
            .signature_algorithm(self.signature_algorithm.into())
            .voice_name(&self.voice)
            .story_words(self.story_words)
            .concurrency(self.concurrency)
            .api_timeout_secs(self.api_timeout);

        if let Some(m) = &self.text_model {
            builder = builder.text_model(m);
        }
        if let Some(m) = &self.image_model {
            builder = builder.image_model(m);
        }
        if let Some(m) = &self.tts_model {
            builder = builder.tts_model(m);
        }

        builder.build().context("Invalid gateway configuration")
    }

    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            static_dir: self.static_dir.clone(),
            cors_allowed_origins: Some(self.cors_origins.clone()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real env vars still apply.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Gateway ──────────────────────────────────────────────────────────
    let config = cli.gateway_config()?;
    info!("Configuration: {:?}", config);
    let gateway = StoryGateway::from_config(config).context("Failed to initialise gateway")?;

    // ── Serve ────────────────────────────────────────────────────────────
    let server = cli.server_config();
    serve(&server, Arc::new(gateway))
        .await
        .with_context(|| format!("Server on {} failed", server.address()))?;
    Ok(())
}
