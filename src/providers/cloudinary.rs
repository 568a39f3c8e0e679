//! Cloudinary signed image upload.
//!
//! Uploads go to `POST {base}/{cloud_name}/image/upload` as multipart form
//! data. Signed uploads authenticate with a digest of the sorted upload
//! parameters followed by the API secret; the secret itself never leaves
//! the process. The digest is SHA-1 unless the account is configured for
//! SHA-256, in which case `signature_algorithm=sha256` is sent along.

use super::BlobStore;
use crate::config::{CloudinaryConfig, GatewayConfig, SignatureAlgorithm};
use crate::error::{GatewayError, ProviderError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

const SERVICE: &str = "cloudinary";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Blob store backed by a Cloudinary account.
#[derive(Clone)]
pub struct CloudinaryStore {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

impl std::fmt::Debug for CloudinaryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CloudinaryStore {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            config: config.cloudinary.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}/image/upload", self.config.base_url, self.config.cloud_name)
    }
}

#[async_trait]
impl BlobStore for CloudinaryStore {
    async fn upload(&self, png: Vec<u8>, folder: &str) -> Result<String, ProviderError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
            .to_string();
        let signature = sign(
            &[("folder", folder), ("timestamp", &timestamp)],
            &self.config.api_secret,
            self.config.signature_algorithm,
        );

        let size = png.len();
        let file = Part::bytes(png)
            .file_name("illustration.png")
            .mime_str("image/png")
            .map_err(|source| ProviderError::Transport {
                service: SERVICE,
                source,
            })?;
        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature);
        if let Some(algorithm) = self.config.signature_algorithm.form_value() {
            form = form.text("signature_algorithm", algorithm);
        }

        let response = self
            .http
            .post(self.endpoint())
            .multipart(form)
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

        let parsed: UploadResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::MalformedResponse {
                service: SERVICE,
                detail: e.to_string(),
            })?;
        debug!("Uploaded {} bytes → {}", size, parsed.secure_url);
        Ok(parsed.secure_url)
    }
}

/// Compute the upload signature: `key=value` pairs sorted by key, joined
/// with `&`, followed by the secret, digested with `algorithm`, lowercase hex.
pub fn sign(
    params: &[(&str, &str)],
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by_key(|(k, _)| *k);
    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let payload = format!("{to_sign}{api_secret}");
    match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(payload.as_bytes())),
    }
}
