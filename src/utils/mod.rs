pub mod mime;
pub mod telemetry;
