use crate::error::PublishError;
use crate::models::ArchiveEntry;
use bytes::Bytes;
use std::io::{Cursor, Read};

/// Reads every file of a zip archive into memory.
///
/// Directory records are skipped. An entry whose path would escape the
/// archive root makes the whole archive malformed.
pub fn expand(data: Bytes) -> Result<Vec<ArchiveEntry>, PublishError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| PublishError::MalformedArchive(format!("Failed to parse ZIP: {}", e)))?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| PublishError::MalformedArchive(format!("Failed to read entry {}: {}", i, e)))?;

        if file.is_dir() {
            continue;
        }
        if file.enclosed_name().is_none() {
            return Err(PublishError::MalformedArchive(format!(
                "Entry '{}' points outside the archive",
                file.name()
            )));
        }

        // The declared size comes from the archive itself and is only
        // checked against what was actually inflated.
        let name = file.name().to_string();
        let declared = file.size();
        let mut content = Vec::new();
        file.read_to_end(&mut content).map_err(|e| {
            PublishError::MalformedArchive(format!("Failed to inflate '{}': {}", name, e))
        })?;
        if content.len() as u64 != declared {
            return Err(PublishError::MalformedArchive(format!(
                "Entry '{}' declares {} bytes but holds {}",
                name,
                declared,
                content.len()
            )));
        }

        entries.push(ArchiveEntry {
            name,
            content: Bytes::from(content),
        });
    }

    Ok(entries)
}

/// [`expand`] on the blocking thread pool.
pub async fn expand_blocking(data: Bytes) -> Result<Vec<ArchiveEntry>, PublishError> {
    tokio::task::spawn_blocking(move || expand(data))
        .await
        .map_err(|e| PublishError::MalformedArchive(format!("Archive expansion aborted: {}", e)))?
}
