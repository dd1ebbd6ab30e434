use crate::models::PublishedObject;
use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;
    async fn put_object(&self, bucket: &str, object: &PublishedObject) -> Result<()>;
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}

pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let res = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        let data = res.body.collect().await?.into_bytes();
        Ok(data)
    }

    async fn put_object(&self, bucket: &str, object: &PublishedObject) -> Result<()> {
        let res = self
            .client
            .put_object()
            .bucket(bucket)
            .key(&object.key)
            .body(ByteStream::from(object.content.clone()))
            .content_type(object.content_type)
            .cache_control(&object.cache_control)
            .send()
            .await;

        if let Err(e) = res {
            tracing::error!(
                "S3 put_object failed: {}/{}, error={:?}",
                bucket,
                object.key,
                e
            );
            return Err(e.into());
        }
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }
}
