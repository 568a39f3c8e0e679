//! Pipeline stages for story illustration and narration.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own and the orchestration in [`crate::illustrate`] stays a
//! plain fold over per-fragment results.
//!
//! ## Data Flow
//!
//! ```text
//! segment ──▶ request ──▶ transcode ──▶ upload
//! (split .)   (Gemini)    (any → PNG)   (Cloudinary)
//! ```
//!
//! 1. [`segment`]: split the story into ordered, trimmed sentence fragments
//! 2. [`request`]: one image-generation call per fragment
//! 3. [`transcode`]: decode whatever the model returned and re-encode it to
//!    PNG on `spawn_blocking`, since decoding is CPU-bound
//! 4. [`upload`]: push the PNG to the blob store, get the public URL
//!
//! Every stage reports failure as a [`crate::error::FragmentError`] carrying
//! the fragment index.
//!
//! [`wav`] is the narration-side helper that wraps raw PCM in a WAV header.

pub mod request;
pub mod segment;
pub mod transcode;
pub mod upload;
pub mod wav;
