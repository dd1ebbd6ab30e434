use crate::services::storage::S3ObjectStore;
use aws_config::SdkConfig;
use std::env;
use std::sync::Arc;
use tracing::info;

/// Loads the shared AWS configuration from the environment (region,
/// credentials chain). `S3_ENDPOINT` points the S3 client at a compatible
/// store such as a local MinIO.
pub async fn load_aws_config() -> SdkConfig {
    let config = aws_config::from_env().load().await;
    info!(
        "☁️  AWS region: {}",
        config
            .region()
            .map(|r| r.as_ref().to_string())
            .unwrap_or_else(|| "<unset>".to_string())
    );
    config
}

pub fn setup_storage(aws_config: &SdkConfig) -> Arc<S3ObjectStore> {
    let mut builder = aws_sdk_s3::config::Builder::from(aws_config);

    if let Ok(endpoint_url) = env::var("S3_ENDPOINT") {
        info!("🪣 S3 endpoint override: {}", endpoint_url);
        builder = builder.endpoint_url(endpoint_url).force_path_style(true);
    }

    let s3_client = aws_sdk_s3::Client::from_conf(builder.build());
    Arc::new(S3ObjectStore::new(s3_client))
}
