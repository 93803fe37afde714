// Synthetic telemetry generator for running the dashboard without a walker attached
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::error::AcquisitionError;
use crate::domain::telemetry::TelemetrySample;
use async_trait::async_trait;
use rand::Rng;

pub const SYNTHETIC_TARGET_METERS: f64 = 50.0;

#[derive(Debug, Clone, Default)]
pub struct SyntheticSource;

impl SyntheticSource {
    pub fn new() -> Self {
        Self
    }

    fn generate(&self) -> TelemetrySample {
        let mut rng = rand::rng();
        TelemetrySample {
            grip_force_newtons: rng.random_range(10.0..=85.0),
            height_millimeters: rng.random_range(750..=900),
            supply_voltage: rng.random_range(11.5..=12.6),
            stability_index: rng.random_range(0.02..=0.15),
            distance_current_meters: rng.random_range(15.5..=45.0),
            distance_target_meters: SYNTHETIC_TARGET_METERS,
            temperature_celsius: rng.random_range(32.0..=38.0),
        }
    }
}

#[async_trait]
impl TelemetrySource for SyntheticSource {
    async fn poll(&self) -> Result<TelemetrySample, AcquisitionError> {
        Ok(self.generate())
    }
}
