use std::time::Duration;

use imagegen_http::{
    credential_from_env, InferenceClient, InferenceRequest, KnownModel, RetryPolicy,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,imagegen_http=debug")),
        )
        .init();

    let credential = credential_from_env().map_err(anyhow::Error::msg)?;
    let mut args = std::env::args().skip(1);
    let prompt = args
        .next()
        .unwrap_or_else(|| "an astronaut riding a horse, oil painting".to_owned());
    let model = args
        .next()
        .and_then(|label| KnownModel::from_label(&label))
        .unwrap_or(KnownModel::FluxSchnell);

    let client = InferenceClient::new();
    let request = InferenceRequest::new(model.endpoint_url(), credential, prompt);
    let policy = RetryPolicy::new(5, Duration::from_secs(10))?;

    tracing::info!(model = model.label(), "generating image");
    let result = client
        .execute_until(
            &request,
            &policy,
            |status| {
                tracing::info!(
                    attempt = status.attempt,
                    "model is loading, retrying in {:.0}s",
                    status.wait_seconds()
                )
            },
            async {
                // Without a Ctrl-C handler the request runs until it finishes.
                if tokio::signal::ctrl_c().await.is_err() {
                    std::future::pending::<()>().await;
                }
            },
        )
        .await;

    match result {
        Ok(image) => {
            let png = image.to_png()?;
            std::fs::write("generated_image.png", png)?;
            println!(
                "saved generated_image.png ({}x{}, received as {})",
                image.width,
                image.height,
                image.mime_type()
            );
        }
        Err(err) if err.should_try_later() => {
            println!("{err}; the model is still warming up, try again in a few minutes");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
