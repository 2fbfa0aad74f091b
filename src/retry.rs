use std::future::Future;

use tokio::time::sleep;

use crate::{AttemptOutcome, GeneratedImage, InferenceError, Result, RetryPolicy, RetryStatus};

/// Drives attempts until an image arrives, a non-retryable outcome occurs,
/// `cancel` resolves, or the policy runs out of attempts.
///
/// `attempt_fn` receives the 0-based attempt index. Only
/// [`AttemptOutcome::StillLoading`] leads to another attempt; the wait before
/// attempt `n + 1` is [`RetryPolicy::wait_for_attempt`]`(n)` and is announced
/// through `on_status` first. There is no wait after the last attempt.
pub(crate) async fn run<A, Fut, S, C>(
    policy: &RetryPolicy,
    mut attempt_fn: A,
    mut on_status: S,
    cancel: C,
) -> Result<GeneratedImage>
where
    A: FnMut(u32) -> Fut,
    Fut: Future<Output = AttemptOutcome>,
    S: FnMut(RetryStatus),
    C: Future<Output = ()>,
{
    policy.validate()?;
    tokio::pin!(cancel);

    let mut last_message = String::new();
    for attempt in 0..policy.max_attempts {
        let outcome = tokio::select! {
            biased;
            () = &mut cancel => return Err(InferenceError::Cancelled { attempts: attempt }),
            outcome = attempt_fn(attempt) => outcome,
        };

        match outcome {
            AttemptOutcome::ImageReady(image) => return Ok(image),
            AttemptOutcome::StillLoading {
                message,
                estimated_wait,
            } => {
                last_message = message;
                let attempts = attempt + 1;
                if attempts == policy.max_attempts {
                    break;
                }

                let wait = policy.wait_for_attempt(attempt);
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    attempt = attempts,
                    ?wait,
                    "model still loading, backing off"
                );
                on_status(RetryStatus {
                    attempt: attempts,
                    wait,
                    estimated_wait,
                });

                tokio::select! {
                    biased;
                    () = &mut cancel => return Err(InferenceError::Cancelled { attempts }),
                    () = sleep(wait) => {}
                }
            }
            AttemptOutcome::TerminalError(message) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(attempt = attempt + 1, "inference failed: {}", message);
                return Err(InferenceError::Terminal(message));
            }
            AttemptOutcome::TransportError { message, timeout } => {
                #[cfg(feature = "tracing")]
                tracing::warn!(attempt = attempt + 1, timeout, "transport error: {}", message);
                return Err(InferenceError::Transport { message, timeout });
            }
        }
    }

    Err(InferenceError::RetriesExhausted {
        attempts: policy.max_attempts,
        last_message,
    })
}
