use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use site_publisher::edge::{CloudFrontEvent, EdgeRequest, path};
use site_publisher::utils::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    run(service_fn(function_handler)).await
}

async fn function_handler(event: LambdaEvent<CloudFrontEvent>) -> Result<EdgeRequest, Error> {
    let request = event
        .payload
        .into_request()
        .ok_or("CloudFront event without a request")?;
    Ok(path::normalize_request(request))
}
