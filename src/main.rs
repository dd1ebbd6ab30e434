use dotenvy::dotenv;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use site_publisher::config::PublisherConfig;
use site_publisher::infrastructure::{cdn, storage};
use site_publisher::models::{PublishReport, S3Event};
use site_publisher::utils::telemetry::init_tracing;
use site_publisher::{ArtifactPublisher, PublishError};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv().ok();
    init_tracing();

    info!("🚀 Starting site publisher...");

    let config = PublisherConfig::from_env();
    info!(
        "⚙️  Destination root={}, Cache-Control='{}', timeout={:?}, stage fallback={:?}, orphans={:?}",
        config.destination_root,
        config.cache_control,
        config.call_timeout,
        config.stage_fallback,
        config.orphan_policy
    );

    // Clients are built once per process and shared by every invocation
    let aws_config = storage::load_aws_config().await;
    let publisher = ArtifactPublisher::new(
        storage::setup_storage(&aws_config),
        cdn::setup_cdn(&aws_config),
        config,
    );

    run(service_fn(|event| function_handler(event, &publisher))).await
}

async fn function_handler(
    event: LambdaEvent<S3Event>,
    publisher: &ArtifactPublisher,
) -> Result<Vec<PublishReport>, Error> {
    info!("📨 Request {}", event.context.request_id);

    match publisher.handle(event.payload).await {
        Ok(reports) => Ok(reports),
        Err(e) => {
            log_failure(&e);
            Err(e.into())
        }
    }
}

fn log_failure(e: &PublishError) {
    match e {
        PublishError::PartialPublish { .. } => error!(
            "❌ {}. Uploaded objects were not rolled back unless ORPHAN_POLICY=remove; the archive is kept for a retry",
            e
        ),
        _ if e.is_retryable() => error!("❌ {}. The archive is kept, re-upload it to retry", e),
        _ => error!("❌ {}. The archive is kept and needs a corrected upload", e),
    }
}
