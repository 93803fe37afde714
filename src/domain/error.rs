// Error taxonomy for acquisition and configuration
use std::time::Duration;
use thiserror::Error;

/// A sample could not be acquired this cycle. Always transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcquisitionError {
    #[error("telemetry poll timed out after {0:?}")]
    Timeout(Duration),
    #[error("telemetry link disconnected: {0}")]
    Disconnected(String),
    #[error("malformed telemetry reading: {0}")]
    Malformed(String),
}

/// Invalid startup configuration. Fatal to process construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("refresh period must be greater than zero")]
    InvalidPeriod,
    #[error("battery range invalid: min {min} V must be below max {max} V")]
    InvalidBatteryRange { min: f64, max: f64 },
    #[error("temperature bands invalid: warn {warn} must be below critical {critical}")]
    InvalidTemperatureBands { warn: f64, critical: f64 },
    #[error("stability limit must be a positive number, got {0}")]
    InvalidStabilityLimit(f64),
    #[error("target distance override must be finite and non-negative, got {0}")]
    InvalidTargetOverride(f64),
    #[error("telemetry source timeout must be greater than zero")]
    InvalidSourceTimeout,
    #[error("telemetry source url invalid: {0}")]
    InvalidSourceUrl(String),
    #[error("failed to load configuration: {0}")]
    Load(String),
}

impl From<config::ConfigError> for ConfigurationError {
    fn from(err: config::ConfigError) -> Self {
        ConfigurationError::Load(err.to_string())
    }
}
