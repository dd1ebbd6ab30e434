use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// CloudFront headers: lowercase name to the list of received values.
pub type Headers = BTreeMap<String, Vec<HeaderValue>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub value: String,
}

impl HeaderValue {
    pub fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.to_string()),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudFrontEvent {
    #[serde(rename = "Records")]
    pub records: Vec<CloudFrontRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudFrontRecord {
    pub cf: CloudFrontPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudFrontPayload {
    pub request: EdgeRequest,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CloudFrontEvent {
    /// Lambda@Edge always delivers exactly one record.
    pub fn into_request(self) -> Option<EdgeRequest> {
        self.records.into_iter().next().map(|r| r.cf.request)
    }
}

/// Viewer or origin request. Fields this crate does not read are kept as-is
/// so a pass-through returns the request unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRequest {
    pub uri: String,
    #[serde(default)]
    pub querystring: String,
    #[serde(default)]
    pub headers: Headers,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EdgeRequest {
    pub fn header_values(&self, name: &str) -> impl Iterator<Item = &str> {
        self.headers
            .get(name)
            .into_iter()
            .flatten()
            .map(|h| h.value.as_str())
    }

    pub fn first_header(&self, name: &str) -> Option<&str> {
        self.header_values(name).next()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeResponse {
    pub status: String,
    #[serde(rename = "statusDescription")]
    pub status_description: String,
    pub headers: Headers,
}

impl EdgeResponse {
    pub fn found(location: impl Into<String>) -> Self {
        let mut headers = Headers::new();
        headers.insert(
            "location".to_string(),
            vec![HeaderValue::new("location", location)],
        );
        Self {
            status: "302".to_string(),
            status_description: "Found".to_string(),
            headers,
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.to_string(), vec![HeaderValue::new(name, value)]);
        self
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get("location")
            .and_then(|values| values.first())
            .map(|h| h.value.as_str())
    }
}

/// What an edge function hands back to CloudFront.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeOutcome {
    Response(EdgeResponse),
    Request(EdgeRequest),
}
