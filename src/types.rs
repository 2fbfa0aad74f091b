use std::{fmt, io::Cursor, time::Duration};

use image::ImageFormat;

use crate::{client::model_endpoint_url, InferenceError, Result};

/// One prompt submission: where to send it, with which credential.
#[derive(Clone, PartialEq, Eq)]
pub struct InferenceRequest {
    pub endpoint: String,
    pub credential: String,
    pub prompt: String,
}

impl fmt::Debug for InferenceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceRequest")
            .field("endpoint", &self.endpoint)
            .field("credential", &"<redacted>")
            .field("prompt", &self.prompt)
            .finish()
    }
}

impl InferenceRequest {
    pub fn new(
        endpoint: impl Into<String>,
        credential: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            credential: credential.into(),
            prompt: prompt.into(),
        }
    }

    /// Creates a request for a model hosted on the default inference host.
    ///
    /// Example: `"black-forest-labs/FLUX.1-schnell"` →
    /// `"https://api-inference.huggingface.co/models/black-forest-labs/FLUX.1-schnell"`
    pub fn for_model(
        model_id: impl AsRef<str>,
        credential: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self::new(model_endpoint_url(model_id.as_ref()), credential, prompt)
    }
}

/// A decoded image returned by the endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Response body exactly as received.
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl GeneratedImage {
    /// Re-encodes the image as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        if self.format == ImageFormat::Png {
            return Ok(self.bytes.clone());
        }
        let decoded = image::load_from_memory_with_format(&self.bytes, self.format)
            .map_err(|err| InferenceError::Terminal(format!("invalid image data: {err}")))?;
        let mut png = Cursor::new(Vec::new());
        decoded
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|err| InferenceError::Terminal(format!("png encoding failed: {err}")))?;
        Ok(png.into_inner())
    }

    /// Suggested download name, e.g. `generated_image.jpg`.
    pub fn file_name(&self) -> String {
        let extension = self.format.extensions_str().first().copied().unwrap_or("bin");
        format!("generated_image.{extension}")
    }

    /// MIME type matching [`GeneratedImage::format`].
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Result of classifying a single HTTP attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum AttemptOutcome {
    ImageReady(GeneratedImage),
    /// The model is cold-starting; the request should be sent again later.
    StillLoading {
        message: String,
        estimated_wait: Option<Duration>,
    },
    TerminalError(String),
    /// The request could not be sent or its body could not be read.
    TransportError { message: String, timeout: bool },
}

impl AttemptOutcome {
    pub(crate) fn transport(err: &reqwest::Error) -> Self {
        let mut message = err.to_string();
        let mut source = std::error::Error::source(err);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        Self::TransportError {
            message,
            timeout: err.is_timeout(),
        }
    }
}

/// Progress event emitted before each backoff sleep.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryStatus {
    /// Number of attempts made so far (1-based).
    pub attempt: u32,
    /// How long the executor will wait before the next attempt.
    pub wait: Duration,
    /// Load time estimate reported by the endpoint, if any.
    pub estimated_wait: Option<Duration>,
}

impl RetryStatus {
    pub fn wait_seconds(&self) -> f64 {
        self.wait.as_secs_f64()
    }
}
