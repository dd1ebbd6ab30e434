use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. JSON lines inside Lambda, where CloudWatch
/// ingests them; human-readable output everywhere else.
pub fn init_tracing() {
    let in_lambda = std::env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok();

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_publisher=info".into()),
        )
        .with(in_lambda.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .without_time()
                .with_target(false)
        }))
        .with((!in_lambda).then(tracing_subscriber::fmt::layer))
        .try_init();
}
