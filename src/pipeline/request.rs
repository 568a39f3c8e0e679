//! Image requests: one generation call per story fragment.
//!
//! The fragment text is the whole prompt. Text and image modalities are
//! both requested because the image-preview models refuse image-only
//! requests; any text they send back is ignored.
//!
//! A failed call comes back as [`FragmentError::GenerationRequestFailed`].
//! The orchestrator treats it as "this fragment produced nothing": it is
//! logged, never retried, and never fails the request on its own.

use super::segment::Fragment;
use crate::error::FragmentError;
use crate::providers::gemini::{GenerateContentRequest, Modality};
use crate::providers::ContentGenerator;
use tracing::debug;

/// Raw image bytes from one inline-data part of a generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Ask the image model to illustrate one fragment.
///
/// Returns every inline payload across all candidates and parts, in
/// response order. An empty vector means the model answered without any
/// image (e.g. text only, or a safety block).
pub async fn request_images(
    generator: &dyn ContentGenerator,
    model: &str,
    fragment: &Fragment,
) -> Result<Vec<ImagePayload>, FragmentError> {
    let request = GenerateContentRequest::with_modalities(
        fragment.text.clone(),
        &[Modality::Text, Modality::Image],
    );

    let response = generator.generate(model, &request).await.map_err(|e| {
        FragmentError::GenerationRequestFailed {
            index: fragment.index,
            detail: e.to_string(),
        }
    })?;

    let payloads: Vec<ImagePayload> = response
        .inline_payloads()
        .map(|inline| ImagePayload {
            mime_type: inline.mime_type.clone(),
            bytes: inline.data.clone(),
        })
        .collect();

    debug!(
        "Fragment {}: {} image payload(s) returned",
        fragment.index,
        payloads.len()
    );
    Ok(payloads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{image_response, FakeGenerator, Reply};

    fn fragment(text: &str) -> Fragment {
        Fragment {
            index: 7,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn sends_fragment_text_with_text_and_image_modalities() {
        let generator = FakeGenerator::new(vec![Reply::Ok(image_response(vec![b"img".to_vec()]))]);
        let payloads = request_images(&generator, "img-model", &fragment("A red kite"))
            .await
            .unwrap();
        assert_eq!(payloads.len(), 1);

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "img-model");
        assert_eq!(calls[0].1, "A red kite");
        assert_eq!(calls[0].2, vec![Modality::Text, Modality::Image]);
    }

    #[tokio::test]
    async fn collects_payloads_in_order() {
        let generator = FakeGenerator::new(vec![Reply::Ok(image_response(vec![
            b"first".to_vec(),
            b"second".to_vec(),
        ]))]);
        let payloads = request_images(&generator, "m", &fragment("x")).await.unwrap();
        let bytes: Vec<&[u8]> = payloads.iter().map(|p| p.bytes.as_slice()).collect();
        assert_eq!(bytes, vec![&b"first"[..], &b"second"[..]]);
        assert_eq!(payloads[0].mime_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn text_only_answer_yields_nothing() {
        let generator = FakeGenerator::new(vec![Reply::Ok(image_response(vec![]))]);
        let payloads = request_images(&generator, "m", &fragment("x")).await.unwrap();
        assert!(payloads.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_is_a_fragment_error() {
        let generator = FakeGenerator::new(vec![Reply::Fail]);
        let err = request_images(&generator, "m", &fragment("x")).await.unwrap_err();
        assert!(matches!(
            err,
            FragmentError::GenerationRequestFailed { index: 7, .. }
        ));
    }
}
