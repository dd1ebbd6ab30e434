use crate::services::cdn::CloudFrontInvalidator;
use aws_config::SdkConfig;
use std::sync::Arc;

pub fn setup_cdn(aws_config: &SdkConfig) -> Arc<CloudFrontInvalidator> {
    let client = aws_sdk_cloudfront::Client::new(aws_config);
    Arc::new(CloudFrontInvalidator::new(client))
}
