//! # story-gateway
//!
//! Turn a one-line prompt into a short illustrated, narrated story.
//!
//! ## Why a gateway?
//!
//! The browser frontend should never hold provider credentials, and
//! illustrating a story takes one image-model call per sentence plus an
//! upload per image. This crate keeps the keys server-side, fans the work out
//! concurrently and hands the browser plain JSON and a WAV file.
//!
//! ## Pipeline Overview
//!
//! ```text
//! prompt ─▶ story      text model             → "Once upon a time. …"
//! story  ─▶ illustrate segment → image model  → PNG → blob store → [{image_url, caption}]
//! text   ─▶ narrate    speech model → PCM     → WAV
//! ```
//!
//! Illustration is best effort: a sentence whose image fails to generate,
//! decode or upload is skipped, and the request only fails when nothing at
//! all could be illustrated. See [`illustrate`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use story_gateway::{GatewayConfig, StoryGateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GatewayConfig::builder()
//!         .gemini_api_key(std::env::var("GOOGLE_API_KEY")?)
//!         .cloudinary("demo", "1234", "secret")
//!         .build()?;
//!     let gateway = StoryGateway::from_config(config)?;
//!
//!     let story = gateway.story("a lighthouse keeper's cat").await?;
//!     for image in gateway.illustrate(&story).await? {
//!         println!("{} → {}", image.caption, image.image_url);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `story-gateway` server binary (clap + anyhow + tracing-subscriber + dotenvy) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod gateway;
pub mod illustrate;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod server;

#[cfg(test)]
mod testing;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    AudioFormat, CloudinaryConfig, GatewayConfig, GatewayConfigBuilder, SignatureAlgorithm,
};
pub use error::{FragmentError, GatewayError, ProviderError};
pub use gateway::StoryGateway;
pub use illustrate::Illustrator;
pub use output::IllustratedFragment;
pub use providers::{BlobStore, ContentGenerator};
pub use server::{router, serve, ServerConfig};
