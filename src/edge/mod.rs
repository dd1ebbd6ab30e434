//! Lambda@Edge request handlers of the site distribution.

pub mod language;
pub mod path;
pub mod types;

pub use types::{CloudFrontEvent, EdgeOutcome, EdgeRequest, EdgeResponse};
