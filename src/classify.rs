use std::time::Duration;

use crate::{
    wire::{ErrorEnvelope, ErrorField},
    AttemptOutcome, GeneratedImage,
};

const LOADING_MARKER: &str = "loading";
const UNRECOGNIZED: &str = "response not recognized as image or error";

/// How a response body looked before any interpretation.
enum Sniffed {
    /// The body parses as JSON.
    Document(ErrorEnvelope),
    /// Anything that does not parse as JSON.
    Binary,
}

fn sniff(body: &[u8]) -> Sniffed {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value @ serde_json::Value::Object(_)) => {
            Sniffed::Document(serde_json::from_value(value).unwrap_or_default())
        }
        Ok(_) => Sniffed::Document(ErrorEnvelope::default()),
        Err(_) => Sniffed::Binary,
    }
}

/// Classifies one raw response body.
///
/// JSON documents are checked first: an `error` mentioning "loading"
/// (any case) means the model is cold-starting, any other `error` is
/// terminal, and a document without one is unrecognized. Everything else
/// must decode as an image.
pub fn classify(body: &[u8]) -> AttemptOutcome {
    match sniff(body) {
        Sniffed::Document(ErrorEnvelope {
            error: Some(error),
            estimated_time,
        }) => classify_error(error, estimated_time),
        Sniffed::Document(_) => AttemptOutcome::TerminalError(UNRECOGNIZED.to_owned()),
        Sniffed::Binary => match decode_image(body) {
            Ok(image) => AttemptOutcome::ImageReady(image),
            Err(detail) => AttemptOutcome::TerminalError(format!(
                "{UNRECOGNIZED}: invalid image data: {detail}"
            )),
        },
    }
}

fn classify_error(error: ErrorField, estimated_time: Option<f64>) -> AttemptOutcome {
    let message = error.into_message();
    if message.to_lowercase().contains(LOADING_MARKER) {
        AttemptOutcome::StillLoading {
            message,
            estimated_wait: estimated_time
                .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
                .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok()),
        }
    } else {
        AttemptOutcome::TerminalError(message)
    }
}

fn decode_image(body: &[u8]) -> Result<GeneratedImage, String> {
    if body.is_empty() {
        return Err("empty body".to_owned());
    }
    let format = image::guess_format(body).map_err(|err| err.to_string())?;
    let decoded =
        image::load_from_memory_with_format(body, format).map_err(|err| err.to_string())?;
    Ok(GeneratedImage {
        bytes: body.to_vec(),
        format,
        width: decoded.width(),
        height: decoded.height(),
    })
}
