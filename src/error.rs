use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Unknown stage segment '{0}'")]
    UnknownStage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A call to the object store or the CDN failed or timed out.
    #[error("{operation} failed: {source}")]
    Transient {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Malformed archive: {0}")]
    MalformedArchive(String),

    /// Some uploads failed. The ones that succeeded are left in place unless
    /// the orphan policy removes them.
    #[error("Partial publish: {uploaded}/{total} objects uploaded, failed: {}", failed.join(", "))]
    PartialPublish {
        failed: Vec<String>,
        uploaded: usize,
        total: usize,
    },
}

impl PublishError {
    pub fn transient(operation: impl Into<String>, source: anyhow::Error) -> Self {
        PublishError::Transient {
            operation: operation.into(),
            source,
        }
    }

    /// Whether re-triggering with the same archive can succeed without any
    /// change to the archive or the configuration.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PublishError::Transient { .. } | PublishError::PartialPublish { .. }
        )
    }
}
