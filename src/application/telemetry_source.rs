// Capability trait for telemetry acquisition
use crate::domain::error::AcquisitionError;
use crate::domain::telemetry::TelemetrySample;
use async_trait::async_trait;

#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Acquire one complete sample from the walker.
    ///
    /// Implementations bound their own blocking time and report a timeout as
    /// `AcquisitionError::Timeout`. Every call is independently fallible.
    async fn poll(&self) -> Result<TelemetrySample, AcquisitionError>;
}
