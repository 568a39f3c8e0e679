//! In-memory fakes of the provider traits, shared by the unit tests.

use crate::error::ProviderError;
use crate::providers::gemini::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, Modality, Part,
};
use crate::providers::{BlobStore, ContentGenerator};
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::collections::{HashMap, HashSet, VecDeque};
use std::io::Cursor;
use std::sync::Mutex;

/// A PNG whose width identifies it in fake-store URLs.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 7 ^ y * 13) as u8, (x * 31) as u8, (y * 17) as u8, 255])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("png encode");
    buf
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 40, 90]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .expect("jpeg encode");
    buf
}

/// A response with one candidate: a text part followed by one inline part
/// per payload.
pub fn image_response(payloads: Vec<Vec<u8>>) -> GenerateContentResponse {
    let mut parts = vec![Part::text("Here is your picture")];
    parts.extend(payloads.into_iter().map(|p| Part::inline("image/png", p)));
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content { role: Some("model".into()), parts }),
            finish_reason: Some("STOP".into()),
        }],
    }
}

pub fn text_response(text: &str) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content {
                role: Some("model".into()),
                parts: vec![Part::text(text)],
            }),
            finish_reason: Some("STOP".into()),
        }],
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Ok(GenerateContentResponse),
    Fail,
}

/// Answers by prompt text when scripted, else pops replies in call order.
#[derive(Default)]
pub struct FakeGenerator {
    by_prompt: HashMap<String, Reply>,
    queue: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(String, GenerateContentRequest)>>,
}

impl FakeGenerator {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            queue: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn by_prompt(replies: Vec<(&str, Reply)>) -> Self {
        Self {
            by_prompt: replies
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            ..Self::default()
        }
    }

    /// `(model, prompt, modalities)` per call, in call order.
    pub fn calls(&self) -> Vec<(String, String, Vec<Modality>)> {
        self.requests()
            .into_iter()
            .map(|(model, req)| {
                let prompt = req.prompt_text().unwrap_or_default().to_string();
                let modalities = req
                    .generation_config
                    .map(|g| g.response_modalities)
                    .unwrap_or_default();
                (model, prompt, modalities)
            })
            .collect()
    }

    pub fn requests(&self) -> Vec<(String, GenerateContentRequest)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentGenerator for FakeGenerator {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), request.clone()));

        let prompt = request.prompt_text().unwrap_or_default();
        let reply = match self.by_prompt.get(prompt) {
            Some(r) => r.clone(),
            None => self.queue.lock().unwrap().pop_front().unwrap_or(Reply::Fail),
        };
        match reply {
            Reply::Ok(resp) => Ok(resp),
            Reply::Fail => Err(ProviderError::Status {
                service: "fake",
                status: 503,
                body: "model overloaded".into(),
            }),
        }
    }
}

/// Blob store whose URLs encode the uploaded image width, so tests can
/// tell which payload ended up where regardless of upload order.
#[derive(Default)]
pub struct FakeStore {
    fail_widths: HashSet<u32>,
    uploads: Mutex<Vec<(String, usize)>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail uploads of images with these widths (0 = undecodable bytes).
    pub fn failing_on(widths: &[u32]) -> Self {
        Self {
            fail_widths: widths.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for FakeStore {
    async fn upload(&self, png: Vec<u8>, folder: &str) -> Result<String, ProviderError> {
        let width = image::load_from_memory(&png).map(|i| i.width()).unwrap_or(0);
        if self.fail_widths.contains(&width) {
            return Err(ProviderError::Status {
                service: "fake-store",
                status: 500,
                body: "bucket unavailable".into(),
            });
        }
        self.uploads
            .lock()
            .unwrap()
            .push((folder.to_string(), png.len()));
        Ok(format!("https://cdn.test/{folder}/{width}.png"))
    }
}
