use crate::error::PublishError;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

/// S3 object notification as delivered to the function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3EventRecord {
    #[serde(rename = "eventName", default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Object {
    /// URL-encoded key, `+` standing for a space.
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Decoded location of an uploaded archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEvent {
    pub source_bucket: String,
    pub source_key: String,
}

impl UploadEvent {
    pub fn from_record(record: &S3EventRecord) -> Result<Self, PublishError> {
        Ok(Self {
            source_bucket: record.s3.bucket.name.clone(),
            source_key: decode_object_key(&record.s3.object.key)?,
        })
    }
}

pub fn decode_object_key(raw: &str) -> Result<String, PublishError> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|key| key.into_owned())
        .map_err(|e| PublishError::InvalidEvent(format!("object key '{}' is not UTF-8: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_object_key() {
        assert_eq!(
            decode_object_key("artifacts/prod/my+site%282%29.zip").unwrap(),
            "artifacts/prod/my site(2).zip"
        );
        // An encoded plus stays a plus
        assert_eq!(
            decode_object_key("artifacts/alpha/a%2Bb.zip").unwrap(),
            "artifacts/alpha/a+b.zip"
        );
        assert!(matches!(
            decode_object_key("artifacts/%FF.zip"),
            Err(PublishError::InvalidEvent(_))
        ));
    }

    #[test]
    fn test_deserialize_notification() {
        let payload = r#"{
            "Records": [{
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": "www.example.com-123456789012" },
                    "object": { "key": "artifacts/prod/package.zip", "size": 1024 }
                }
            }]
        }"#;
        let event: S3Event = serde_json::from_str(payload).unwrap();
        assert_eq!(event.records.len(), 1);

        let upload = UploadEvent::from_record(&event.records[0]).unwrap();
        assert_eq!(upload.source_bucket, "www.example.com-123456789012");
        assert_eq!(upload.source_key, "artifacts/prod/package.zip");
        assert_eq!(
            event.records[0].event_name.as_deref(),
            Some("ObjectCreated:Put")
        );
    }
}
