pub mod event;

pub use event::{S3Event, S3EventRecord, UploadEvent};

use crate::config::StageFallback;
use crate::error::PublishError;
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment environment an archive is published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Alpha,
    #[serde(rename = "prod")]
    Production,
}

impl Stage {
    /// Folder name used both under `artifacts/` and under the destination root.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Alpha => "alpha",
            Stage::Production => "prod",
        }
    }

    /// Exact folder literal, as written under `artifacts/`.
    pub fn from_folder(segment: &str) -> Option<Self> {
        match segment {
            "alpha" => Some(Stage::Alpha),
            "prod" => Some(Stage::Production),
            _ => None,
        }
    }

    /// Reads the stage from the second segment of an archive key
    /// (`artifacts/<stage>/...`). Only the exact folder names count.
    pub fn from_key(key: &str, fallback: StageFallback) -> Result<Self, PublishError> {
        let segment = key.split('/').nth(1).unwrap_or("");
        match (Stage::from_folder(segment), fallback) {
            (Some(stage), _) => Ok(stage),
            (None, StageFallback::Alpha) => {
                tracing::warn!(
                    "⚠️  Key '{}' has no recognized stage segment ('{}'), publishing to alpha",
                    key,
                    segment
                );
                Ok(Stage::Alpha)
            }
            (None, StageFallback::Reject) => Err(PublishError::UnknownStage(segment.to_string())),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alpha" => Ok(Stage::Alpha),
            "prod" | "production" => Ok(Stage::Production),
            other => Err(format!("unknown stage '{}'", other)),
        }
    }
}

/// One file record read out of an archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Relative path inside the archive, nested directories included.
    pub name: String,
    pub content: Bytes,
}

#[derive(Debug, Clone)]
pub struct PublishedObject {
    pub key: String,
    pub content: Bytes,
    pub content_type: &'static str,
    pub cache_control: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationRequest {
    pub distribution_id: String,
    pub caller_reference: String,
    pub paths: Vec<String>,
}

impl InvalidationRequest {
    /// Invalidation of every path of a distribution.
    pub fn full(distribution_id: impl Into<String>) -> Self {
        Self {
            distribution_id: distribution_id.into(),
            caller_reference: format!(
                "{}-{}",
                Utc::now().timestamp_millis(),
                uuid::Uuid::new_v4()
            ),
            paths: vec!["/*".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationAck {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum CleanupOutcome {
    Deleted,
    Failed(String),
}

/// Summary of one processed archive, returned to the invoking platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishReport {
    pub source_bucket: String,
    pub source_key: String,
    pub stage: Stage,
    pub published_keys: Vec<String>,
    pub invalidation: InvalidationAck,
    pub cleanup: CleanupOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_from_key() {
        assert_eq!(
            Stage::from_key("artifacts/prod/build.zip", StageFallback::Reject).unwrap(),
            Stage::Production
        );
        assert_eq!(
            Stage::from_key("artifacts/alpha/build.zip", StageFallback::Reject).unwrap(),
            Stage::Alpha
        );
    }

    #[test]
    fn test_stage_fallback() {
        assert_eq!(
            Stage::from_key("artifacts/beta/build.zip", StageFallback::Alpha).unwrap(),
            Stage::Alpha
        );
        assert_eq!(
            Stage::from_key("build.zip", StageFallback::Alpha).unwrap(),
            Stage::Alpha
        );
        match Stage::from_key("artifacts/beta/build.zip", StageFallback::Reject) {
            Err(PublishError::UnknownStage(segment)) => assert_eq!(segment, "beta"),
            other => panic!("expected UnknownStage, got {:?}", other),
        }
    }

    #[test]
    fn test_stage_segment_must_match_exactly() {
        assert_eq!(
            Stage::from_key("artifacts/PROD/build.zip", StageFallback::Alpha).unwrap(),
            Stage::Alpha
        );
        assert_eq!(
            Stage::from_key("artifacts/production/build.zip", StageFallback::Alpha).unwrap(),
            Stage::Alpha
        );
        match Stage::from_key("artifacts/Production/build.zip", StageFallback::Reject) {
            Err(PublishError::UnknownStage(segment)) => assert_eq!(segment, "Production"),
            other => panic!("expected UnknownStage, got {:?}", other),
        }
    }

    #[test]
    fn test_stage_folder_names() {
        assert_eq!(Stage::Production.to_string(), "prod");
        assert_eq!(Stage::Alpha.to_string(), "alpha");
        assert_eq!("PROD".parse::<Stage>().unwrap(), Stage::Production);
        assert_eq!("production".parse::<Stage>().unwrap(), Stage::Production);
        assert!("staging".parse::<Stage>().is_err());
    }

    #[test]
    fn test_invalidation_references_are_unique() {
        let a = InvalidationRequest::full("E123");
        let b = InvalidationRequest::full("E123");
        assert_ne!(a.caller_reference, b.caller_reference);
        assert_eq!(a.paths, vec!["/*".to_string()]);
        assert_eq!(a.distribution_id, "E123");
    }
}
