use std::fmt;
use std::future::{pending, Future};
use std::time::Duration;

use reqwest::header;

use crate::{
    classify, retry,
    wire::InferencePayload,
    AttemptOutcome, ClientOptions, InferenceError, InferenceRequest, QueryResult, RetryPolicy,
    RetryStatus,
};

/// Host serving the hosted inference API.
pub const INFERENCE_HOST: &str = "api-inference.huggingface.co";

/// Formats a model ID into the endpoint URL on [`INFERENCE_HOST`].
///
/// Example: `"Kvikontent/midjourney-v6"` →
/// `"https://api-inference.huggingface.co/models/Kvikontent/midjourney-v6"`
pub fn model_endpoint_url(model_id: &str) -> String {
    model_endpoint_url_with_host(INFERENCE_HOST, model_id)
}

/// Formats a model ID into an endpoint URL on a custom host.
pub fn model_endpoint_url_with_host(host: &str, model_id: &str) -> String {
    format!(
        "https://{}/models/{}",
        host.trim().trim_end_matches('/'),
        model_id.trim().trim_matches('/')
    )
}

/// Reads the API credential from the environment.
///
/// Reads `HUGGINGFACE_API_KEY`, falling back to `HF_TOKEN`. Returns an error
/// if neither is set or the value is empty.
pub fn credential_from_env() -> std::result::Result<String, String> {
    let (name, value) = ["HUGGINGFACE_API_KEY", "HF_TOKEN"]
        .into_iter()
        .find_map(|name| std::env::var(name).ok().map(|value| (name, value)))
        .ok_or_else(|| {
            "missing HUGGINGFACE_API_KEY or HF_TOKEN environment variable".to_owned()
        })?;
    if value.trim().is_empty() {
        return Err(format!("{name} is set but empty"));
    }
    Ok(value)
}

#[derive(Clone, Default)]
/// HTTP client for text-to-image inference endpoints.
pub struct InferenceClient {
    http: reqwest::Client,
    options: ClientOptions,
}

impl fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceClient")
            .field("options", &self.options)
            .finish()
    }
}

impl InferenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies client options such as the per-request timeout.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Sends the prompt and waits for the model to produce an image,
    /// retrying while the endpoint reports that the model is loading.
    ///
    /// Exactly one result is produced per call: the image, or the first
    /// non-retryable failure, or [`InferenceError::RetriesExhausted`].
    pub async fn execute(&self, request: &InferenceRequest, policy: &RetryPolicy) -> QueryResult {
        self.execute_until(request, policy, |_| {}, pending()).await
    }

    /// Like [`InferenceClient::execute`], calling `on_status` before each
    /// backoff wait.
    pub async fn execute_with_progress<S>(
        &self,
        request: &InferenceRequest,
        policy: &RetryPolicy,
        on_status: S,
    ) -> QueryResult
    where
        S: FnMut(RetryStatus),
    {
        self.execute_until(request, policy, on_status, pending()).await
    }

    /// Like [`InferenceClient::execute_with_progress`], giving up with
    /// [`InferenceError::Cancelled`] as soon as `cancel` resolves.
    ///
    /// Cancellation is observed while a request is in flight and while
    /// waiting between attempts.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use imagegen_http::{InferenceClient, InferenceRequest, RetryPolicy};
    ///
    /// # async fn run() {
    /// let client = InferenceClient::new();
    /// let request =
    ///     InferenceRequest::for_model("black-forest-labs/FLUX.1-schnell", "hf_xxx", "a red fox");
    /// let result = client
    ///     .execute_until(
    ///         &request,
    ///         &RetryPolicy::default(),
    ///         |status| println!("still loading, waiting {:.0}s", status.wait_seconds()),
    ///         tokio::time::sleep(Duration::from_secs(300)),
    ///     )
    ///     .await;
    /// # let _ = result;
    /// # }
    /// ```
    pub async fn execute_until<S, C>(
        &self,
        request: &InferenceRequest,
        policy: &RetryPolicy,
        on_status: S,
        cancel: C,
    ) -> QueryResult
    where
        S: FnMut(RetryStatus),
        C: Future<Output = ()>,
    {
        if request.credential.trim().is_empty() {
            return Err(InferenceError::MissingCredential);
        }
        let authorization = normalize_bearer_authorization(&request.credential);

        retry::run(
            policy,
            |attempt| self.send_attempt(request, &authorization, attempt),
            on_status,
            cancel,
        )
        .await
    }

    async fn send_attempt(
        &self,
        request: &InferenceRequest,
        authorization: &str,
        #[allow(unused_variables)] attempt: u32,
    ) -> AttemptOutcome {
        let response = self
            .http
            .post(&request.endpoint)
            .header(header::AUTHORIZATION, authorization)
            .header(header::ACCEPT, "image/*, application/json")
            .timeout(Duration::from_millis(self.options.timeout_ms))
            .json(&InferencePayload {
                inputs: &request.prompt,
            })
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(err) => return AttemptOutcome::transport(&err),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            attempt = attempt + 1,
            status = response.status().as_u16(),
            "inference response received"
        );

        match response.bytes().await {
            Ok(body) => classify(&body),
            Err(err) => AttemptOutcome::transport(&err),
        }
    }
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
