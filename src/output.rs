//! Result types returned to HTTP callers.

use serde::{Deserialize, Serialize};

/// One illustrated sentence of the story.
///
/// Serialises as `{"image_url": "...", "caption": "..."}`, the shape the
/// frontend consumes directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IllustratedFragment {
    /// Public URL of the uploaded PNG.
    pub image_url: String,
    /// The story fragment the image was generated from.
    pub caption: String,
}
