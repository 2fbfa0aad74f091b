/// Error type returned by this crate.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    /// Non-retryable failure reported by or about the endpoint's response.
    #[error("inference failed: {0}")]
    Terminal(String),
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {message}")]
    Transport {
        /// Rendered `reqwest` error, including its source chain.
        message: String,
        /// Whether the per-request timeout elapsed.
        timeout: bool,
    },
    /// Every attempt reported that the model is still loading.
    #[error("max retries reached after {attempts} attempts: {last_message}")]
    RetriesExhausted {
        attempts: u32,
        /// Loading message from the last response.
        last_message: String,
    },
    /// The cancellation future resolved before a result was available.
    #[error("request cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
    /// The bearer credential was empty.
    #[error("missing API credential")]
    MissingCredential,
    #[error("invalid retry policy: {0}")]
    InvalidPolicy(String),
}

/// Coarse category of an [`InferenceError`], for presentation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    Terminal,
    Transport,
    RetriesExhausted,
    Cancelled,
    Configuration,
}

impl InferenceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Terminal(_) => FailureKind::Terminal,
            Self::Transport { .. } => FailureKind::Transport,
            Self::RetriesExhausted { .. } => FailureKind::RetriesExhausted,
            Self::Cancelled { .. } => FailureKind::Cancelled,
            Self::MissingCredential | Self::InvalidPolicy(_) => FailureKind::Configuration,
        }
    }

    /// Returns `true` when the model was still warming up and resubmitting
    /// later is likely to succeed.
    pub fn should_try_later(&self) -> bool {
        self.kind() == FailureKind::RetriesExhausted
    }
}
