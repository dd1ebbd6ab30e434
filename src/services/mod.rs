pub mod archive;
pub mod artifact_upload;
pub mod cdn;
pub mod publisher;
pub mod storage;
pub mod transform;
