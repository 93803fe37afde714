// Telemetry sample domain model
use serde::{Deserialize, Serialize};

/// One consistent set of walker sensor readings taken at a single point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub grip_force_newtons: f64,
    pub height_millimeters: i32,
    pub supply_voltage: f64,
    pub stability_index: f64,
    pub distance_current_meters: f64,
    pub distance_target_meters: f64,
    pub temperature_celsius: f64,
}

impl TelemetrySample {
    /// Replace the therapy goal with a configured one, if any.
    pub fn with_target_override(mut self, target: Option<f64>) -> Self {
        if let Some(target) = target {
            self.distance_target_meters = target;
        }
        self
    }

    /// Name of the first non-finite reading, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        [
            ("grip_force_newtons", self.grip_force_newtons),
            ("supply_voltage", self.supply_voltage),
            ("stability_index", self.stability_index),
            ("distance_current_meters", self.distance_current_meters),
            ("distance_target_meters", self.distance_target_meters),
            ("temperature_celsius", self.temperature_celsius),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(name, _)| name)
    }
}

#[cfg(test)]
pub(crate) fn sample_fixture() -> TelemetrySample {
    TelemetrySample {
        grip_force_newtons: 42.0,
        height_millimeters: 820,
        supply_voltage: 11.55,
        stability_index: 0.05,
        distance_current_meters: 25.0,
        distance_target_meters: 50.0,
        temperature_celsius: 35.0,
    }
}
