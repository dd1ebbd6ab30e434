use crate::models::{InvalidationAck, InvalidationRequest};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use aws_sdk_cloudfront::Client;
use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};

/// Edge cache that must forget published paths.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn create_invalidation(&self, request: &InvalidationRequest) -> Result<InvalidationAck>;
}

pub struct CloudFrontInvalidator {
    client: Client,
}

impl CloudFrontInvalidator {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CacheInvalidator for CloudFrontInvalidator {
    async fn create_invalidation(&self, request: &InvalidationRequest) -> Result<InvalidationAck> {
        let paths = Paths::builder()
            .quantity(request.paths.len() as i32)
            .set_items(Some(request.paths.clone()))
            .build()?;
        let batch = InvalidationBatch::builder()
            .paths(paths)
            .caller_reference(&request.caller_reference)
            .build()?;

        let res = self
            .client
            .create_invalidation()
            .distribution_id(&request.distribution_id)
            .invalidation_batch(batch)
            .send()
            .await?;

        let invalidation = res
            .invalidation()
            .ok_or_else(|| anyhow!("CloudFront returned no invalidation"))?;

        Ok(InvalidationAck {
            id: invalidation.id().to_string(),
            status: invalidation.status().to_string(),
        })
    }
}
