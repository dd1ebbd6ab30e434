pub mod config;
pub mod edge;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

pub use error::PublishError;
pub use services::publisher::ArtifactPublisher;
