use crate::config::{OrphanPolicy, PublisherConfig};
use crate::error::PublishError;
use crate::models::{
    CleanupOutcome, InvalidationAck, InvalidationRequest, PublishReport, PublishedObject, S3Event,
    Stage, UploadEvent,
};
use crate::services::archive;
use crate::services::cdn::CacheInvalidator;
use crate::services::storage::ObjectStore;
use crate::services::transform::transform_entry;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Unpacks uploaded site archives into the stage folder, invalidates the
/// stage's CDN distribution and removes the archive.
pub struct ArtifactPublisher {
    storage: Arc<dyn ObjectStore>,
    cdn: Arc<dyn CacheInvalidator>,
    config: PublisherConfig,
}

impl ArtifactPublisher {
    pub fn new(
        storage: Arc<dyn ObjectStore>,
        cdn: Arc<dyn CacheInvalidator>,
        config: PublisherConfig,
    ) -> Self {
        Self {
            storage,
            cdn,
            config,
        }
    }

    /// Processes every record of a notification in order, stopping at the
    /// first failure.
    pub async fn handle(&self, event: S3Event) -> Result<Vec<PublishReport>, PublishError> {
        if event.records.is_empty() {
            return Err(PublishError::InvalidEvent(
                "notification has no records".to_string(),
            ));
        }

        let mut reports = Vec::with_capacity(event.records.len());
        for record in &event.records {
            let upload = UploadEvent::from_record(record)?;
            reports.push(self.publish(&upload).await?);
        }
        Ok(reports)
    }

    pub async fn publish(&self, upload: &UploadEvent) -> Result<PublishReport, PublishError> {
        let bucket = upload.source_bucket.as_str();
        let key = upload.source_key.as_str();
        info!("📦 Publishing s3://{}/{}", bucket, key);

        let stage = Stage::from_key(key, self.config.stage_fallback)?;
        let distribution_id = self
            .config
            .distributions
            .resolve(stage, bucket)
            .ok_or_else(|| {
                PublishError::Configuration(format!(
                    "no CDN distribution configured for stage {} (bucket {})",
                    stage, bucket
                ))
            })?
            .to_string();
        let prefix = self.config.destination_prefix(stage);

        let data = self
            .timed("get_object", self.storage.get_object(bucket, key))
            .await?;
        info!("📥 Fetched archive ({} bytes)", data.len());

        let entries = archive::expand_blocking(data).await?;
        info!("🗂️  Archive holds {} files, stage {}", entries.len(), stage);

        let objects: Vec<PublishedObject> = entries
            .into_iter()
            .map(|entry| transform_entry(entry, &prefix, &self.config.cache_control))
            .collect();

        let published_keys = self.publish_objects(bucket, objects).await?;
        info!("📤 Uploaded {} objects under {}", published_keys.len(), prefix);

        let invalidation = self.invalidate(&distribution_id).await?;

        let cleanup = match self
            .timed("delete_object", self.storage.delete_object(bucket, key))
            .await
        {
            Ok(()) => {
                info!("🧹 Removed archive s3://{}/{}", bucket, key);
                CleanupOutcome::Deleted
            }
            Err(e) => {
                error!(
                    "❌ Site published but archive s3://{}/{} could not be removed: {}",
                    bucket, key, e
                );
                CleanupOutcome::Failed(e.to_string())
            }
        };

        info!("✅ Published {} to {}", key, stage);
        Ok(PublishReport {
            source_bucket: bucket.to_string(),
            source_key: key.to_string(),
            stage,
            published_keys,
            invalidation,
            cleanup,
        })
    }

    /// Uploads all objects concurrently and waits for every one of them.
    /// Any failure fails the whole step, after all uploads have settled.
    async fn publish_objects(
        &self,
        bucket: &str,
        objects: Vec<PublishedObject>,
    ) -> Result<Vec<String>, PublishError> {
        let total = objects.len();
        let limit = self.config.upload_concurrency.unwrap_or(total).max(1);

        let results: Vec<(String, Result<(), PublishError>)> = stream::iter(objects)
            .map(|object| async move {
                let res = self
                    .timed("put_object", self.storage.put_object(bucket, &object))
                    .await;
                (object.key, res)
            })
            .buffer_unordered(limit)
            .collect()
            .await;

        let mut uploaded = Vec::with_capacity(total);
        let mut failed = Vec::new();
        for (key, res) in results {
            match res {
                Ok(()) => uploaded.push(key),
                Err(e) => {
                    warn!("⚠️  Upload of {} failed: {}", key, e);
                    failed.push(key);
                }
            }
        }

        if failed.is_empty() {
            uploaded.sort();
            return Ok(uploaded);
        }

        failed.sort();
        if self.config.orphan_policy == OrphanPolicy::Remove {
            self.remove_orphans(bucket, &uploaded).await;
        }
        Err(PublishError::PartialPublish {
            failed,
            uploaded: uploaded.len(),
            total,
        })
    }

    /// Best-effort removal of the objects of a failed publish.
    async fn remove_orphans(&self, bucket: &str, keys: &[String]) {
        info!("🧹 Removing {} objects of the failed publish", keys.len());
        let failures = stream::iter(keys)
            .map(|key| async move {
                self.timed("delete_object", self.storage.delete_object(bucket, key))
                    .await
                    .err()
                    .map(|e| (key, e))
            })
            .buffer_unordered(keys.len().max(1))
            .filter_map(|failure| async move { failure })
            .collect::<Vec<_>>()
            .await;

        for (key, e) in failures {
            warn!("⚠️  Orphaned object s3://{}/{} left in place: {}", bucket, key, e);
        }
    }

    async fn invalidate(&self, distribution_id: &str) -> Result<InvalidationAck, PublishError> {
        let request = InvalidationRequest::full(distribution_id);
        let ack = self
            .timed("create_invalidation", self.cdn.create_invalidation(&request))
            .await?;
        info!(
            "🌐 Invalidation {} ({}) created on distribution {}",
            ack.id, ack.status, distribution_id
        );
        Ok(ack)
    }

    async fn timed<T, F>(&self, operation: &str, call: F) -> Result<T, PublishError>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        with_timeout(operation, self.config.call_timeout, call).await
    }
}

/// Runs one remote call under a deadline. Expiry counts as that call failing.
pub async fn with_timeout<T, F>(
    operation: &str,
    limit: Duration,
    call: F,
) -> Result<T, PublishError>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(res) => res.map_err(|e| PublishError::transient(operation, e)),
        Err(_) => Err(PublishError::transient(
            operation,
            anyhow::anyhow!("timed out after {:?}", limit),
        )),
    }
}
