// Domain layer - Plain data and pure transforms
pub mod dashboard;
pub mod error;
pub mod metrics;
pub mod telemetry;
