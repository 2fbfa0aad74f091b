//! `imagegen-http` is an async client for text-to-image inference endpoints.
//!
//! The crate posts a prompt to a Hugging Face style `/models/<id>` endpoint
//! and keeps retrying while the model is cold-starting:
//! - [`InferenceClient::execute`]
//! - [`InferenceClient::execute_with_progress`]
//! - [`InferenceClient::execute_until`]
//!
//! Every response body goes through [`classify`], which has no I/O and can be
//! used on its own.

mod classify;
mod client;
mod error;
mod models;
mod options;
mod retry;
mod types;
mod wire;

pub use classify::classify;
pub use client::{
    credential_from_env, model_endpoint_url, model_endpoint_url_with_host, InferenceClient,
    INFERENCE_HOST,
};
pub use error::{FailureKind, InferenceError};
pub use models::KnownModel;
pub use options::{ClientOptions, RetryPolicy, BACKOFF_MULTIPLIER};
pub use types::{AttemptOutcome, GeneratedImage, InferenceRequest, RetryStatus};

/// Final value of one inference request.
pub type QueryResult = Result<GeneratedImage>;

pub type Result<T> = std::result::Result<T, InferenceError>;
