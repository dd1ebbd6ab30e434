use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use site_publisher::config::EdgeConfig;
use site_publisher::edge::{CloudFrontEvent, EdgeOutcome, language};
use site_publisher::utils::telemetry::init_tracing;

/// Viewer-request function. Lambda@Edge provides no environment variables,
/// so the compiled-in [`EdgeConfig::default`] applies.
#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    let config = EdgeConfig::default();
    run(service_fn(|event| function_handler(event, &config))).await
}

async fn function_handler(
    event: LambdaEvent<CloudFrontEvent>,
    config: &EdgeConfig,
) -> Result<EdgeOutcome, Error> {
    let request = event
        .payload
        .into_request()
        .ok_or("CloudFront event without a request")?;
    Ok(language::resolve(request, config))
}
