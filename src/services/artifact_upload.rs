use crate::models::{PublishedObject, Stage};
use crate::services::storage::ObjectStore;
use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Object name the publisher is triggered by.
pub const ARTIFACT_NAME: &str = "package.zip";

pub fn artifact_key(stage: Stage, file_name: &str) -> String {
    format!("artifacts/{}/{}", stage, file_name)
}

/// First `.zip` file of a directory, by name.
pub fn find_archive(dir: &Path) -> Result<PathBuf> {
    let mut archives: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
        })
        .collect();
    archives.sort();

    archives
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("The folder {} doesn't contain a .zip file", dir.display()))
}

/// Uploads a local site archive where the publisher picks it up. Returns the
/// object key.
pub async fn upload_artifact(
    store: &dyn ObjectStore,
    bucket: &str,
    stage: Stage,
    archive: &Path,
) -> Result<String> {
    let data = tokio::fs::read(archive)
        .await
        .with_context(|| format!("Failed to read {}", archive.display()))?;

    let object = PublishedObject {
        key: artifact_key(stage, ARTIFACT_NAME),
        content: Bytes::from(data),
        content_type: "application/zip",
        cache_control: "no-cache".to_string(),
    };

    tracing::info!(
        "📤 Uploading {} ({} bytes) to s3://{}/{}",
        archive.display(),
        object.content.len(),
        bucket,
        object.key
    );
    store.put_object(bucket, &object).await?;
    Ok(object.key)
}
