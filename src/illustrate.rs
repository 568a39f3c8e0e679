//! Story illustration: the per-sentence fan-out pipeline.
//!
//! ```text
//! story ─▶ segment ─┬─▶ fragment 0 ─▶ request ─▶ [payload]* ─▶ transcode ─▶ upload
//!                   ├─▶ fragment 1 ─▶ …
//!                   └─▶ fragment N ─▶ …
//!                                    ╰────────── collect_illustrations ──────────╯
//! ```
//!
//! ## Failure policy
//!
//! Best effort. Every fragment and every payload produces its own
//! `Result<IllustratedFragment, FragmentError>`. [`collect_illustrations`]
//! logs and drops the failures and keeps the successes in order. Only a
//! completely empty result is an error ([`GatewayError::NoImagesGenerated`]):
//! a partially illustrated story is still useful, an empty one is not.
//!
//! ## Ordering under concurrency
//!
//! Fragments are illustrated `concurrency` at a time through
//! [`StreamExt::buffered`], which yields results in input order no matter
//! which request finishes first. Payloads inside one fragment are processed
//! sequentially. The output order is therefore always fragment order, then
//! payload order.

use crate::config::GatewayConfig;
use crate::error::{FragmentError, GatewayError};
use crate::output::IllustratedFragment;
use crate::pipeline::request::{request_images, ImagePayload};
use crate::pipeline::segment::{segment, Fragment};
use crate::pipeline::transcode::transcode;
use crate::pipeline::upload::upload;
use crate::providers::{BlobStore, ContentGenerator};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of one payload (or of a whole fragment whose request failed).
pub type Outcome = Result<IllustratedFragment, FragmentError>;

/// Runs the illustration pipeline against injected providers.
#[derive(Clone)]
pub struct Illustrator {
    generator: Arc<dyn ContentGenerator>,
    store: Arc<dyn BlobStore>,
    image_model: String,
    folder: String,
    concurrency: usize,
}

impl Illustrator {
    pub fn new(
        generator: Arc<dyn ContentGenerator>,
        store: Arc<dyn BlobStore>,
        config: &GatewayConfig,
    ) -> Self {
        Self {
            generator,
            store,
            image_model: config.image_model.clone(),
            folder: config.cloudinary.folder.clone(),
            concurrency: config.concurrency.max(1),
        }
    }

    /// Illustrate every sentence of `story`.
    ///
    /// # Errors
    /// [`GatewayError::NoImagesGenerated`] when no fragment produced an
    /// uploaded image, including when the story has no fragments at all.
    pub async fn generate_images(
        &self,
        story: &str,
    ) -> Result<Vec<IllustratedFragment>, GatewayError> {
        let start = Instant::now();
        let fragments = segment(story);
        let total = fragments.len();
        info!("Illustrating {} fragment(s)", total);

        let per_fragment: Vec<Vec<Outcome>> = stream::iter(fragments.into_iter().map(|fragment| {
            let this = self.clone();
            async move { this.illustrate_fragment(&fragment).await }
        }))
        .buffered(self.concurrency)
        .collect()
        .await;

        let result = collect_illustrations(total, per_fragment.into_iter().flatten());
        if let Ok(ref images) = result {
            info!(
                "Illustrated {} image(s) for {} fragment(s) in {}ms",
                images.len(),
                total,
                start.elapsed().as_millis()
            );
        }
        result
    }

    /// Request, transcode and upload everything for one fragment.
    async fn illustrate_fragment(&self, fragment: &Fragment) -> Vec<Outcome> {
        let payloads =
            match request_images(self.generator.as_ref(), &self.image_model, fragment).await {
                Ok(p) => p,
                Err(e) => return vec![Err(e)],
            };

        let mut outcomes = Vec::with_capacity(payloads.len());
        for payload in payloads {
            outcomes.push(self.illustrate_payload(fragment, payload).await);
        }
        outcomes
    }

    async fn illustrate_payload(&self, fragment: &Fragment, payload: ImagePayload) -> Outcome {
        let png = transcode(fragment.index, payload).await?;
        let image_url = upload(self.store.as_ref(), fragment.index, png, &self.folder).await?;
        debug!("Fragment {}: uploaded → {}", fragment.index, image_url);
        Ok(IllustratedFragment {
            image_url,
            caption: fragment.text.clone(),
        })
    }
}

/// Fold per-unit outcomes into the final ordered result.
///
/// Failures are logged and discarded; successes keep their relative order.
/// `fragments` is the number of fragments the story was split into and is
/// only used for reporting.
pub fn collect_illustrations(
    fragments: usize,
    outcomes: impl IntoIterator<Item = Outcome>,
) -> Result<Vec<IllustratedFragment>, GatewayError> {
    let mut images = Vec::new();
    let mut failures = 0usize;

    for outcome in outcomes {
        match outcome {
            Ok(image) => images.push(image),
            Err(e) => {
                failures += 1;
                warn!("{}", e);
            }
        }
    }

    if failures > 0 {
        info!("Dropped {} failed fragment/payload unit(s)", failures);
    }

    if images.is_empty() {
        return Err(GatewayError::NoImagesGenerated { fragments });
    }
    Ok(images)
}
